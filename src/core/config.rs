//! Shared helpers for reading the TOML files under `config/`.
use std::{fmt, fs, io, path::Path};

use bevy::log::warn;
use serde::de::DeserializeOwned;

/// Failure while reading or parsing a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, source: io::Error },
    Parse { path: String, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "failed to read {}: {}", path, source),
            Self::Parse { path, source } => write!(f, "failed to parse {}: {}", path, source),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Reads and deserialises a TOML file.
pub fn read_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: label.clone(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: label,
        source,
    })
}

/// Reads a TOML file, falling back to `T::default()` (with a warning) on any failure.
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: impl AsRef<Path>) -> T {
    match read_toml(path) {
        Ok(value) => value,
        Err(err) => {
            warn!("{}. Falling back to defaults.", err);
            T::default()
        }
    }
}
