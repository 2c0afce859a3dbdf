use chrono::{NaiveDate, NaiveDateTime};

use crate::{ExerciseID, Load, LoadError};

pub const NOTES_SEPARATOR: &str = " | ";

/// All sets logged on a single date.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub date: String,
    pub sets: Vec<Set>,
    pub notes: Option<String>,
}

impl Workout {
    /// Create a workout, collecting the notes of all sets.
    #[must_use]
    pub fn new(date: &str, sets: Vec<Set>) -> Self {
        let notes = sets
            .iter()
            .map(|s| s.notes.as_str())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>();
        Self {
            date: date.trim().to_string(),
            notes: if notes.is_empty() {
                None
            } else {
                Some(notes.join(NOTES_SEPARATOR))
            },
            sets,
        }
    }

    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn sets_of(&self, exercise: ExerciseID) -> impl Iterator<Item = &Set> {
        self.sets.iter().filter(move |s| s.exercise == exercise)
    }
}

/// A single performance of an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub exercise: ExerciseID,
    pub reps: u32,
    pub weight: String,
    pub notes: String,
}

impl Set {
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        !self.weight.trim().is_empty()
    }

    pub fn load(&self) -> Result<Load, LoadError> {
        Load::parse(&self.weight)
    }
}

/// Parse an ISO 8601 date, ignoring a time part if present.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
