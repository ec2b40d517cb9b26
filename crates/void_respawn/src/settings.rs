//! Plugin settings, read from `settings.ron` in the plugin data directory.
//!
//! The file is optional and only needs the fields that differ from the defaults:
//!
//! ```ron
//! (void_level: -64.0)
//! ```

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ron error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoidRespawnSettings {
    /// Respawn point file, relative to the plugin data directory.
    pub store_file: String,
    /// Players strictly below this height are in the void.
    pub void_level: f64,
    /// Name of the command (`/void setspawn`).
    pub command: String,
    /// Capability required to set a respawn point.
    pub permission: String,
}

impl Default for VoidRespawnSettings {
    fn default() -> Self {
        Self {
            store_file: "config.yml".into(),
            void_level: 0.0,
            command: "void".into(),
            permission: "voidrespawn.setspawn".into(),
        }
    }
}

impl VoidRespawnSettings {
    pub const FILE_NAME: &'static str = "settings.ron";

    /// Loads the settings of the plugin living in `data_dir`.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(data_dir: &Path) -> Result<Self, SettingsError> {
        let path = data_dir.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(ron::from_str(&content)?)
    }

    pub fn usage(&self) -> String {
        format!("/{} setspawn", self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = VoidRespawnSettings::load(tmp.path()).unwrap();
        assert_eq!(settings, VoidRespawnSettings::default());
        assert_eq!(settings.usage(), "/void setspawn");
    }

    #[test]
    fn empty_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(VoidRespawnSettings::FILE_NAME), "  \n").unwrap();
        assert_eq!(
            VoidRespawnSettings::load(tmp.path()).unwrap(),
            VoidRespawnSettings::default()
        );
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(VoidRespawnSettings::FILE_NAME),
            "(void_level: -64.0, command: \"abyss\")",
        )
        .unwrap();

        let settings = VoidRespawnSettings::load(tmp.path()).unwrap();
        assert_eq!(settings.void_level, -64.0);
        assert_eq!(settings.command, "abyss");
        assert_eq!(settings.store_file, "config.yml");
        assert_eq!(settings.permission, "voidrespawn.setspawn");
    }

    #[test]
    fn broken_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(VoidRespawnSettings::FILE_NAME), "(void_level: ").unwrap();
        assert!(matches!(
            VoidRespawnSettings::load(tmp.path()),
            Err(SettingsError::Ron(_))
        ));
    }
}
