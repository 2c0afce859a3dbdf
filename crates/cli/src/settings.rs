use std::{fs, path::Path};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub chart_width: u32,
    pub chart_height: u32,
    pub marker_size: u32,
    pub weight_unit: String,
}

impl Settings {
    /// Read settings from a JSON file. Missing fields keep their defaults.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        let settings: Settings = serde_json::from_str(content)?;

        if settings.chart_width < 100 || settings.chart_height < 100 {
            return Err(Error::ChartSize(settings.chart_width, settings.chart_height));
        }

        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            chart_width: 640,
            chart_height: 320,
            marker_size: 3,
            weight_unit: "lbs".to_string(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("chart size must be at least 100x100 ({0}x{1})")]
    ChartSize(u32, u32),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
