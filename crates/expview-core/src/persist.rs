//! Versioned persistence of the `config` subtree.
//!
//! The stored envelope carries the schema version it was written with. A
//! restored envelope whose version is older than [`CURRENT_SCHEMA_VERSION`]
//! (or that has no version at all) is discarded and the defaults are used.
//! There are no migrations: a schema change bumps the version and older
//! configuration is dropped. Equal or newer versions are accepted as-is.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::config::ConfigState;
use crate::error::{ExpviewError, Result};
use crate::storage;

pub const CURRENT_SCHEMA_VERSION: u64 = 20_171_012;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfig {
    #[serde(default, deserialize_with = "deserialize_version")]
    pub version: Option<u64>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    pub config: ConfigState,
}

impl PersistedConfig {
    pub fn new(config: ConfigState) -> Self {
        Self {
            version: Some(CURRENT_SCHEMA_VERSION),
            saved_at: Some(Utc::now()),
            config,
        }
    }
}

/// Any finite number counts as a version, integer or not.
fn version_number(value: &serde_yaml::Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn deserialize_version<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<u64>, D::Error> {
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    // Float-to-int casts saturate, so oversized versions stay above the current one.
    Ok(value.as_ref().and_then(version_number).map(|v| v as u64))
}

fn is_current(version: Option<f64>) -> bool {
    version.is_some_and(|v| v >= CURRENT_SCHEMA_VERSION as f64)
}

/// Outcome of reading a persisted configuration file.
#[derive(Debug, Clone, PartialEq)]
pub enum Restored {
    /// No file on disk.
    Missing,
    /// The file was written by an older schema and was ignored.
    Stale { version: Option<f64> },
    /// The file could not be decoded and was ignored.
    Unreadable,
    Loaded(PersistedConfig),
}

impl Restored {
    /// The configuration to start from: the stored one, else defaults.
    pub fn into_config(self) -> ConfigState {
        match self {
            Restored::Loaded(envelope) => envelope.config,
            _ => ConfigState::default(),
        }
    }
}

/// YAML file holding a [`PersistedConfig`].
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and apply the version gate.
    ///
    /// The version is checked before the payload is decoded, so blobs from an
    /// older schema are dropped even when their shape no longer parses.
    pub fn read(&self) -> Result<Restored> {
        let value = match storage::load_yaml_value(&self.path) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(Restored::Missing),
            Err(ExpviewError::Yaml(e)) => {
                warn!(path = %self.path.display(), error = %e, "Persisted config is not valid YAML, using defaults");
                return Ok(Restored::Unreadable);
            }
            Err(ExpviewError::Io(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), error = %e, "Persisted config is not valid UTF-8, using defaults");
                return Ok(Restored::Unreadable);
            }
            Err(e) => return Err(e),
        };

        let version = value.get("version").and_then(version_number);
        if !is_current(version) {
            info!(
                path = %self.path.display(),
                stored = ?version,
                current = CURRENT_SCHEMA_VERSION,
                "Discarding persisted config from an older schema"
            );
            return Ok(Restored::Stale { version });
        }

        match serde_yaml::from_value::<PersistedConfig>(value) {
            Ok(envelope) => Ok(Restored::Loaded(envelope)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Persisted config is unreadable, using defaults");
                Ok(Restored::Unreadable)
            }
        }
    }

    /// Configuration to start from; defaults unless a current-schema file exists.
    pub fn load(&self) -> Result<ConfigState> {
        Ok(self.read()?.into_config())
    }

    pub fn save(&self, config: &ConfigState) -> Result<()> {
        storage::save_yaml(&self.path, &PersistedConfig::new(config.clone()))
    }

    /// Remove the file. Missing files are fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartSize;
    use tempfile::TempDir;

    fn config() -> ConfigState {
        let mut config = ConfigState::default();
        config.global.chart_size = ChartSize::Large;
        config.global.polling_rate = 0;
        config
    }

    fn write_versioned(storage: &ConfigStorage, version: &str) {
        let body = serde_yaml::to_string(&config()).unwrap();
        let mut content = format!("{version}config:\n");
        for line in body.lines() {
            content.push_str("  ");
            content.push_str(line);
            content.push('\n');
        }
        std::fs::write(storage.path(), content).unwrap();
    }

    #[test]
    fn test_version_gate_on_files() {
        let tmp = TempDir::new().unwrap();
        let storage = ConfigStorage::new(tmp.path().join("config.yaml"));

        storage.save(&config()).unwrap();
        assert_eq!(storage.load().unwrap(), config());

        write_versioned(&storage, &format!("version: {}\n", CURRENT_SCHEMA_VERSION - 1));
        assert_eq!(storage.load().unwrap(), ConfigState::default());

        write_versioned(&storage, "");
        assert_eq!(storage.read().unwrap(), Restored::Stale { version: None });

        write_versioned(&storage, "version: current\n");
        assert_eq!(storage.read().unwrap(), Restored::Stale { version: None });

        write_versioned(&storage, &format!("version: {}\n", CURRENT_SCHEMA_VERSION + 1));
        assert_eq!(storage.load().unwrap(), config());
    }

    #[test]
    fn test_newer_versions_beyond_u32_and_floats_are_accepted() {
        let tmp = TempDir::new().unwrap();
        let storage = ConfigStorage::new(tmp.path().join("config.yaml"));

        write_versioned(&storage, "version: 99999999999\n");
        let Restored::Loaded(envelope) = storage.read().unwrap() else {
            panic!("newer version was not loaded");
        };
        assert_eq!(envelope.version, Some(99_999_999_999));
        assert_eq!(envelope.config, config());

        write_versioned(&storage, &format!("version: {}.0\n", CURRENT_SCHEMA_VERSION));
        assert_eq!(storage.load().unwrap(), config());

        write_versioned(&storage, "version: 20170920.0\n");
        assert_eq!(
            storage.read().unwrap(),
            Restored::Stale {
                version: Some(20_170_920.0)
            }
        );
    }

    #[test]
    fn test_non_utf8_file_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        let storage = ConfigStorage::new(tmp.path().join("config.yaml"));
        std::fs::write(storage.path(), [0xff, 0xfe, 0x00, 0x76]).unwrap();
        assert_eq!(storage.read().unwrap(), Restored::Unreadable);

        std::fs::write(storage.path(), b"version: \xc3\x28\n").unwrap();
        assert_eq!(storage.read().unwrap(), Restored::Unreadable);
        assert_eq!(storage.load().unwrap(), ConfigState::default());
    }
}
