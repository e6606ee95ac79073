use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collector::VisibilityWindows;

/// Tunables for the visualization core, loadable from a RON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub visibility: VisibilityWindows,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_ron() {
        let settings = Settings {
            visibility: VisibilityWindows {
                lookahead: 240,
                lookbehind: 480,
            },
        };
        let text = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default())
            .expect("serialize");
        let parsed: Settings = ron::from_str(&text).expect("parse");
        assert_eq!(parsed.visibility, settings.visibility);
    }

    #[test]
    fn default_windows_are_in_ticks() {
        let settings = Settings::default();
        assert_eq!(settings.visibility.lookahead, 960);
        assert_eq!(settings.visibility.lookbehind, 1920);
    }
}
