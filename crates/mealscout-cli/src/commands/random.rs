//! Random command - A random selection of recipes

use anyhow::{Context, Result};
use clap::Args;

use super::{create_api, load_config, output_recipes, OutputFormat};
use crate::progress;
use crate::GlobalOptions;

/// Arguments for the random command
#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Number of recipes to show
    #[arg(long, short = 'n', default_value = "12")]
    limit: usize,

    /// Output format: text (default), json
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFormat,
}

/// Execute the random command
pub async fn execute(args: RandomArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let api = create_api(&config).await?;

    let pb = progress::spinner("Picking recipes...", global.quiet);
    let result = api.random_recipes(args.limit).await;
    progress::clear_spinner(pb);

    let recipes = result.context("Failed to fetch random recipes")?;

    if recipes.is_empty() {
        if !global.quiet {
            eprintln!("No recipes available");
        }
        return Ok(());
    }

    output_recipes(&recipes, args.output)
}
