//! Configuration loader with inheritance support.
//!
//! Loads configuration from multiple sources and merges them:
//! 1. Global config: `~/.mealscout/config.toml`
//! 2. Local config: `.mealscout/config.toml` (in the project directory)
//! 3. CLI overrides
//!
//! Later sources override earlier ones.

use crate::error::ConfigError;
use crate::{
    ApiConfig, ConfigOverrides, LoggingConfig, ScoutConfig, SearchConfig, DEFAULT_DEBOUNCE_MS,
    DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration directory name, used both under `$HOME` and locally.
const CONFIG_DIR: &str = ".mealscout";

/// Locates and merges the global and local configuration files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.mealscout`)
    global_config_dir: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory (`~/.mealscout`).
    pub fn new() -> Self {
        let global_config_dir = dirs::home_dir().map(|h| h.join(CONFIG_DIR));

        Self { global_config_dir }
    }

    /// Create a loader with a custom global config directory.
    ///
    /// Useful for testing.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
        }
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the local config file path for a project directory.
    pub fn local_config_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// Load configuration for a project directory with optional CLI overrides.
    ///
    /// Merges config in order: global → local → overrides.
    pub fn load(
        &self,
        project_dir: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<ScoutConfig, ConfigError> {
        let mut config = ScoutConfig::default();

        if let Some(global_config) = self.load_global()? {
            config = merge_configs(config, global_config);
        }

        if let Some(local_config) = self.load_local(project_dir)? {
            config = merge_configs(config, local_config);
        }

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        Ok(config)
    }

    /// Load only the global configuration.
    pub fn load_global(&self) -> Result<Option<ScoutConfig>, ConfigError> {
        let Some(global_path) = self.global_config_path() else {
            debug!("No home directory found, skipping global config");
            return Ok(None);
        };

        if !global_path.exists() {
            trace!("Global config not found at {:?}", global_path);
            return Ok(None);
        }

        debug!("Loading global config from {:?}", global_path);
        load_config_file(&global_path).map(Some)
    }

    /// Load only the local configuration for a project directory.
    pub fn load_local(&self, project_dir: &Path) -> Result<Option<ScoutConfig>, ConfigError> {
        let local_path = self.local_config_path(project_dir);

        if !local_path.exists() {
            trace!("Local config not found at {:?}", local_path);
            return Ok(None);
        }

        debug!("Loading local config from {:?}", local_path);
        load_config_file(&local_path).map(Some)
    }

    /// Load a single configuration file given explicitly (e.g. `--config`).
    pub fn load_file(&self, path: &Path) -> Result<ScoutConfig, ConfigError> {
        debug!("Loading config from {:?}", path);
        load_config_file(path)
    }

    /// Initialize the global configuration file with defaults.
    ///
    /// Leaves an existing file untouched.
    pub fn init_global(&self) -> Result<PathBuf, ConfigError> {
        let Some(ref global_dir) = self.global_config_dir else {
            return Err(ConfigError::NoHomeDir);
        };

        init_config_file(&global_dir.join(CONFIG_FILE_NAME))
    }

    /// Initialize the local configuration file with defaults.
    pub fn init_local(&self, project_dir: &Path) -> Result<PathBuf, ConfigError> {
        init_config_file(&self.local_config_path(project_dir))
    }
}

fn init_config_file(config_path: &Path) -> Result<PathBuf, ConfigError> {
    if !config_path.exists() {
        save_config_file(config_path, &ScoutConfig::default())?;
    }

    Ok(config_path.to_path_buf())
}

/// Load a configuration file from disk.
fn load_config_file(path: &Path) -> Result<ScoutConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a configuration file, creating its directory if needed.
fn save_config_file(path: &Path, config: &ScoutConfig) -> Result<(), ConfigError> {
    let unwritable = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ConfigError::Unwritable { path, source }
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(unwritable(parent))?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(unwritable(path))
}

/// Merge two configurations, with `overlay` taking precedence.
///
/// A value in `overlay` only wins when it differs from the default, so a
/// partial local file does not reset values set globally.
fn merge_configs(base: ScoutConfig, overlay: ScoutConfig) -> ScoutConfig {
    ScoutConfig {
        api: merge_api(base.api, overlay.api),
        search: merge_search(base.search, overlay.search),
        logging: merge_logging(base.logging, overlay.logging),
    }
}

fn merge_api(base: ApiConfig, overlay: ApiConfig) -> ApiConfig {
    let defaults = ApiConfig::default();

    ApiConfig {
        endpoint: if overlay.endpoint != DEFAULT_ENDPOINT {
            overlay.endpoint
        } else {
            base.endpoint
        },
        token_env: if overlay.token_env != defaults.token_env {
            overlay.token_env
        } else {
            base.token_env
        },
        timeout_secs: if overlay.timeout_secs != defaults.timeout_secs {
            overlay.timeout_secs
        } else {
            base.timeout_secs
        },
        user_id: overlay.user_id.or(base.user_id),
        fixture: overlay.fixture.or(base.fixture),
    }
}

fn merge_search(base: SearchConfig, overlay: SearchConfig) -> SearchConfig {
    let defaults = SearchConfig::default();

    SearchConfig {
        debounce_ms: if overlay.debounce_ms != DEFAULT_DEBOUNCE_MS {
            overlay.debounce_ms
        } else {
            base.debounce_ms
        },
        page_size: if overlay.page_size != DEFAULT_PAGE_SIZE {
            overlay.page_size
        } else {
            base.page_size
        },
        page_increment: if overlay.page_increment != DEFAULT_PAGE_SIZE {
            overlay.page_increment
        } else {
            base.page_increment
        },
        base_url: if overlay.base_url != defaults.base_url {
            overlay.base_url
        } else {
            base.base_url
        },
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: if overlay.level != "info" {
            overlay.level
        } else {
            base.level
        },
        format: overlay.format,
    }
}
