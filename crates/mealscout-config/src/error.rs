//! Configuration errors.
//!
//! File errors carry the path they concern. Validation errors carry the
//! dotted key of the offending setting (`search.page_size`), which is also
//! the key `mealscout config show` accepts.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    /// A config file exists but could not be read
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid TOML, or a value has the wrong type
    #[error("{} is not a valid config file: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A config file or its directory could not be created
    #[error("cannot write {}: {source}", path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot render configuration as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    /// The global file was asked for but there is no home directory
    #[error("no home directory to hold the global configuration")]
    NoHomeDir,

    /// A setting that has to be present is empty
    #[error("{key} is required {condition}")]
    Required {
        key: &'static str,
        condition: &'static str,
    },

    /// A count or duration that has to be positive is zero
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },

    #[error("logging.level '{value}' is not one of {}", LOG_LEVELS.join(", "))]
    UnknownLevel { value: String },
}

impl ConfigError {
    /// Dotted key of the setting that failed validation.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Required { key, .. } | Self::Zero { key } => Some(*key),
            Self::UnknownLevel { .. } => Some("logging.level"),
            _ => None,
        }
    }

    /// File the error concerns, for read, parse and write failures.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Unreadable { path, .. }
            | Self::Malformed { path, .. }
            | Self::Unwritable { path, .. } => Some(path),
            _ => None,
        }
    }
}
