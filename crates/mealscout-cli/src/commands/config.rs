//! Config command - View and manage configuration
//!
//! - Show configuration file locations
//! - Show the effective configuration, or one value by dotted key
//! - Create a configuration file with defaults

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use mealscout_config::{ConfigLoader, ScoutConfig};
use serde::Serialize;

use super::load_config;
use crate::GlobalOptions;

/// Config management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show configuration file paths
    Path(PathArgs),

    /// Show the effective configuration
    Show(ShowArgs),

    /// Create a configuration file with default values
    Init(InitArgs),
}

/// Arguments for the path command
#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Only show this key (e.g., "search.page_size")
    key: Option<String>,

    /// Output as JSON instead of TOML
    #[arg(long)]
    json: bool,
}

/// Arguments for the init command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Create the global config (~/.mealscout/config.toml) instead of local
    #[arg(long)]
    global: bool,
}

/// Configuration paths
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPaths {
    /// Global config file path
    pub global: Option<PathBuf>,
    /// Local config file path
    pub local: PathBuf,
    /// Whether global config exists
    pub global_exists: bool,
    /// Whether local config exists
    pub local_exists: bool,
}

/// Execute the config command
pub async fn execute(cmd: ConfigCommand, global: GlobalOptions) -> Result<()> {
    match cmd {
        ConfigCommand::Path(args) => execute_path(args),
        ConfigCommand::Show(args) => execute_show(args, global),
        ConfigCommand::Init(args) => execute_init(args, global),
    }
}

fn execute_path(args: PathArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let loader = ConfigLoader::new();

    let global_path = loader.global_config_path();
    let local_path = loader.local_config_path(&cwd);

    let paths = ConfigPaths {
        global: global_path.clone(),
        local: local_path.clone(),
        global_exists: global_path.as_ref().map(|p| p.exists()).unwrap_or(false),
        local_exists: local_path.exists(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    println!("Configuration Paths");
    println!("===================\n");

    match paths.global {
        Some(ref gp) => println!("Global: {} ({})", gp.display(), status(paths.global_exists)),
        None => println!("Global: not available (no home directory)"),
    }
    println!(
        "Local:  {} ({})",
        paths.local.display(),
        status(paths.local_exists)
    );

    Ok(())
}

fn execute_show(args: ShowArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;

    let Some(ref key) = args.key else {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to render configuration")?
            );
        }
        return Ok(());
    };

    let value = get_config_value(&config, key)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            serde_json::Value::Null => println!("(unset)"),
            other => println!("{}", other),
        }
    }

    Ok(())
}

fn execute_init(args: InitArgs, global: GlobalOptions) -> Result<()> {
    let loader = ConfigLoader::new();

    let path = if args.global {
        loader.init_global()?
    } else {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        loader.init_local(&cwd)?
    };

    if !global.quiet {
        println!("Configuration file: {}", path.display());
    }
    Ok(())
}

/// Get a configuration value by dotted key path
fn get_config_value(config: &ScoutConfig, key: &str) -> Option<serde_json::Value> {
    let json = serde_json::to_value(config).ok()?;

    let mut current = &json;
    for part in key.split('.') {
        current = current.get(part)?;
    }

    Some(current.clone())
}

fn status(exists: bool) -> &'static str {
    if exists {
        "exists"
    } else {
        "not found"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let config = ScoutConfig::default();

        assert_eq!(
            get_config_value(&config, "search.page_size"),
            Some(serde_json::json!(12))
        );
        assert_eq!(
            get_config_value(&config, "api.token_env"),
            Some(serde_json::json!("MEALSCOUT_API_TOKEN"))
        );
        assert_eq!(
            get_config_value(&config, "logging.format"),
            Some(serde_json::json!("text"))
        );
        assert_eq!(get_config_value(&config, "search.nope"), None);
        assert_eq!(get_config_value(&config, "nope"), None);
    }
}
