use super::*;
use std::fs;
use thiserror::Error;

pub const SETTINGS_PATH: &str = "assets/encounter.ron";

pub fn plugin(app: &mut App) {
    app.insert_resource(load_settings());
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to read encounter settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid encounter tuning: {0}")]
    Invalid(#[from] ConfigError),
}

#[derive(Resource, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Fixed seed for a reproducible run; fresh entropy when absent.
    pub seed: Option<u64>,
    /// Seconds of simulation before the run is called a draw.
    pub time_limit: f32,
    pub encounter: EncounterConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            time_limit: 240.0,
            encounter: EncounterConfig::default(),
        }
    }
}

impl Settings {
    pub fn read() -> Result<Self, SettingsError> {
        let content = fs::read_to_string(SETTINGS_PATH)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = ron::from_str(content)?;
        settings.encounter.validate()?;
        Ok(settings)
    }
}

fn load_settings() -> Settings {
    match Settings::read() {
        Ok(settings) => {
            info!("loaded encounter settings from {SETTINGS_PATH}");
            settings
        }
        Err(e) => {
            info!("unable to load encounter settings, switching to defaults: {e}");
            Settings::default()
        }
    }
}
