//! MealScout Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `~/.mealscout/config.toml`
//! - Local config: `.mealscout/config.toml` (in the working directory)
//! - CLI overrides via `ConfigOverrides`
//!
//! Configuration is merged in order: global → local → CLI overrides.

mod error;
mod loader;

pub use error::{ConfigError, LOG_LEVELS};
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default GraphQL endpoint of the recipe API.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8686/graphql";

/// Default environment variable holding the API bearer token.
pub const DEFAULT_TOKEN_ENV: &str = "MEALSCOUT_API_TOKEN";

/// Default number of recipes requested by the first fetch for a term.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Default quiet period before a typed term is searched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Root configuration for MealScout.
///
/// Represents the fully merged configuration from all sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ScoutConfig {
    /// Remote recipe API configuration
    pub api: ApiConfig,

    /// Incremental search behaviour
    pub search: SearchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote recipe API configuration.
///
/// # Example TOML
///
/// ```toml
/// [api]
/// endpoint = "https://recipes.example.com/graphql"
/// token_env = "MEALSCOUT_API_TOKEN"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,

    /// Environment variable name containing the bearer token
    pub token_env: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User identifier sent with per-user queries (recipe detail)
    pub user_id: Option<String>,

    /// Serve recipes from a local JSON file instead of the remote API
    pub fixture: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token_env: Some(DEFAULT_TOKEN_ENV.to_string()),
            timeout_secs: 30,
            user_id: None,
            fixture: None,
        }
    }
}

impl ApiConfig {
    /// Resolve the bearer token from the configured environment variable.
    pub fn token(&self) -> Option<String> {
        self.token_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|token| !token.is_empty())
    }

    /// Validate that the selected API source is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixture.is_none() && self.endpoint.trim().is_empty() {
            return Err(ConfigError::Required {
                key: "api.endpoint",
                condition: "when api.fixture is not set",
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Zero {
                key: "api.timeout_secs",
            });
        }
        Ok(())
    }
}

/// Incremental search configuration.
///
/// ```toml
/// [search]
/// debounce_ms = 500
/// page_size = 12
/// page_increment = 12
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period in milliseconds before a typed term is searched
    pub debounce_ms: u64,

    /// Number of recipes requested by the first fetch for a term
    pub page_size: usize,

    /// Number of extra recipes requested each time the sentinel is reached
    pub page_increment: usize,

    /// Page URL the search term is written into as `?q=`
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_size: DEFAULT_PAGE_SIZE,
            page_increment: DEFAULT_PAGE_SIZE,
            base_url: "http://localhost:5173/search".to_string(),
        }
    }
}

impl SearchConfig {
    /// Debounce delay as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Zero {
                key: "search.page_size",
            });
        }
        if self.page_increment == 0 {
            return Err(ConfigError::Zero {
                key: "search.page_increment",
            });
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// `level` must name a log level; case is ignored.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::UnknownLevel {
                value: self.level.clone(),
            });
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON structured logging
    Json,
}

/// CLI overrides for configuration values.
///
/// Used to apply command-line arguments over file-based config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override API endpoint
    pub endpoint: Option<String>,

    /// Override fixture file (offline mode)
    pub fixture: Option<PathBuf>,

    /// Override user identifier
    pub user_id: Option<String>,

    /// Override debounce delay
    pub debounce_ms: Option<u64>,

    /// Override initial page size
    pub page_size: Option<usize>,

    /// Override log level
    pub log_level: Option<String>,
}

impl ScoutConfig {
    /// Apply CLI overrides to this configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref endpoint) = overrides.endpoint {
            self.api.endpoint = endpoint.clone();
        }

        if let Some(ref fixture) = overrides.fixture {
            self.api.fixture = Some(fixture.clone());
        }

        if let Some(ref user_id) = overrides.user_id {
            self.api.user_id = Some(user_id.clone());
        }

        if let Some(debounce_ms) = overrides.debounce_ms {
            self.search.debounce_ms = debounce_ms;
        }

        if let Some(page_size) = overrides.page_size {
            self.search.page_size = page_size;
        }

        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.search.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
