//! Import options and their RON persistence

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{NOSE_PROFILE_DIVISIONS, ROCKET_ENTRY_NAME};

/// Options controlling how a rocket document is resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Number of samples along a nose-cone profile (at least 2 are taken)
    pub profile_divisions: usize,
    /// Spherical-cap blunting radius for ogive tips (0 keeps the tip sharp)
    pub tip_radius: f64,
    /// Fail instead of substituting 0 when an "auto" field cannot be resolved,
    /// and instead of skipping a nose cone whose curve has no profile
    pub strict_auto: bool,
    /// Name of the document entry inside `.ork` zip archives
    pub archive_entry: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            profile_divisions: NOSE_PROFILE_DIVISIONS,
            tip_radius: 0.0,
            strict_auto: false,
            archive_entry: ROCKET_ENTRY_NAME.to_string(),
        }
    }
}

impl ImportOptions {
    pub fn strict() -> Self {
        Self {
            strict_auto: true,
            ..Self::default()
        }
    }

    /// Save options to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OptionsError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| OptionsError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| OptionsError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load options from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path).map_err(|e| OptionsError::Io(e.to_string()))?;
        Self::from_ron(&content)
    }

    pub fn from_ron(content: &str) -> Result<Self, OptionsError> {
        ron::from_str(content).map_err(|e| OptionsError::Deserialize(e.to_string()))
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = ImportOptions::default();
        assert_eq!(options.profile_divisions, 100);
        assert_eq!(options.tip_radius, 0.0);
        assert!(!options.strict_auto);
        assert_eq!(options.archive_entry, "rocket.ork");
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.ron");

        let options = ImportOptions {
            profile_divisions: 40,
            tip_radius: 1.5,
            ..ImportOptions::strict()
        };
        options.save(&path).unwrap();

        assert_eq!(ImportOptions::load(&path).unwrap(), options);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let options = ImportOptions::from_ron("(strict_auto: true)").unwrap();
        assert!(options.strict_auto);
        assert_eq!(options.profile_divisions, 100);
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            ImportOptions::from_ron("(profile_divisions: \"many\")"),
            Err(OptionsError::Deserialize(_))
        ));
    }
}
