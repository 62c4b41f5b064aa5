//! Similar command - Recipes resembling a given recipe

use anyhow::{Context, Result};
use clap::Args;

use super::{create_api, load_config, output_recipes, OutputFormat};
use crate::progress;
use crate::GlobalOptions;

/// Arguments for the similar command
#[derive(Args, Debug)]
pub struct SimilarArgs {
    /// Recipe identifier to compare against
    id: String,

    /// Number of recipes to show
    #[arg(long, short = 'n', default_value = "6")]
    limit: usize,

    /// Output format: text (default), json
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFormat,
}

/// Execute the similar command
pub async fn execute(args: SimilarArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let api = create_api(&config).await?;

    let pb = progress::spinner("Finding similar recipes...", global.quiet);
    let result = api.similar_recipes(&args.id, args.limit).await;
    progress::clear_spinner(pb);

    let recipes =
        result.with_context(|| format!("Failed to find recipes similar to {}", args.id))?;

    if recipes.is_empty() {
        if !global.quiet {
            eprintln!("No similar recipes found for {}", args.id);
        }
        return Ok(());
    }

    if args.output == OutputFormat::Text && !global.quiet {
        println!("Recipes similar to {}:\n", args.id);
    }
    output_recipes(&recipes, args.output)
}
