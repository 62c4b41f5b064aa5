//! CLI command implementations
//!
//! This module contains all MealScout CLI command implementations.

pub mod config;
pub mod favourites;
pub mod random;
pub mod recipe;
pub mod recommend;
pub mod search;
pub mod similar;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use mealscout_client::{RecipeApi, RecipeSummary};
use mealscout_config::{ConfigLoader, ScoutConfig};

use crate::GlobalOptions;

/// Output format shared by the listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Load configuration: an explicit file, or global → local for the
/// current directory, then the command-line overrides.
pub fn load_config(global: &GlobalOptions) -> Result<ScoutConfig> {
    let loader = ConfigLoader::new();

    let mut config = match global.config {
        Some(ref path) => loader
            .load_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            loader
                .load(&cwd, None)
                .context("Failed to load configuration")?
        }
    };

    config.apply_overrides(&global.to_config_overrides());
    if let Err(e) = config.validate() {
        let context = match e.key() {
            Some(key) => format!("Invalid configuration: check `{}`", key),
            None => "Invalid configuration".to_string(),
        };
        return Err(anyhow::Error::new(e).context(context));
    }
    Ok(config)
}

/// User for per-user queries: `--user`, else `api.user_id`.
pub fn resolve_user(user: Option<String>, config: &ScoutConfig) -> Result<String> {
    user.or_else(|| config.api.user_id.clone())
        .context("No user id: pass --user or set api.user_id in the configuration")
}

/// Connect to the recipe source selected by the configuration.
pub async fn create_api(config: &ScoutConfig) -> Result<Arc<dyn RecipeApi>> {
    mealscout_client::connect(&config.api)
        .await
        .context("Failed to set up recipe API")
}

/// Print a numbered recipe list.
pub fn print_recipes(recipes: &[RecipeSummary]) {
    let width = recipes.len().to_string().len();
    for (i, recipe) in recipes.iter().enumerate() {
        println!("{:>width$}. {}", i + 1, recipe, width = width);
    }
}

/// Print recipes in the requested format.
pub fn output_recipes(recipes: &[RecipeSummary], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(recipes).context("Failed to serialize recipes")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_recipes(recipes),
    }
    Ok(())
}
