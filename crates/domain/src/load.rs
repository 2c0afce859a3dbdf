/// Numeric interpretation of a logged weight.
///
/// Weights are stored as text because a set may be performed with bodyweight
/// only (`bodyweight`, `body`, `bw`) or with additional load on top of
/// bodyweight (`body+15`). Only the external part is counted as load.
/// Negative values denote assistance, e.g. on an assisted pull-up machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Load {
    External(f32),
    Bodyweight,
    BodyweightPlus(f32),
}

const BODYWEIGHT_TOKENS: [&str; 3] = ["bodyweight", "body", "bw"];

impl Load {
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let text = text.trim();

        if text.is_empty() {
            return Err(LoadError::Empty);
        }

        let lower = text.to_lowercase();

        if BODYWEIGHT_TOKENS.contains(&lower.as_str()) {
            return Ok(Load::Bodyweight);
        }

        if let Some((base, increment)) = lower.split_once('+') {
            if BODYWEIGHT_TOKENS.contains(&base.trim()) {
                return parse_number(increment)
                    .map(Load::BodyweightPlus)
                    .ok_or_else(|| LoadError::Invalid(text.to_string()));
            }
        }

        parse_number(&lower)
            .map(Load::External)
            .ok_or_else(|| LoadError::Invalid(text.to_string()))
    }

    /// Load added on top of bodyweight.
    #[must_use]
    pub fn added(self) -> f32 {
        match self {
            Load::External(value) | Load::BodyweightPlus(value) => value,
            Load::Bodyweight => 0.0,
        }
    }
}

fn parse_number(text: &str) -> Option<f32> {
    text.replace(',', ".")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LoadError {
    #[error("Weight is empty")]
    Empty,
    #[error("Weight must be a decimal or a bodyweight token ('{0}')")]
    Invalid(String),
}
