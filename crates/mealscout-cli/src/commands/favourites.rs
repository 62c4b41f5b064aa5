//! Favourites command - A user's favourite recipes

use anyhow::{Context, Result};
use clap::Args;

use super::{create_api, load_config, output_recipes, resolve_user, OutputFormat};
use crate::progress;
use crate::GlobalOptions;

/// Arguments for the favourites command
#[derive(Args, Debug)]
pub struct FavouritesArgs {
    /// User whose favourites are listed (defaults to api.user_id)
    #[arg(long, short = 'u')]
    user: Option<String>,

    /// Number of recipes to show
    #[arg(long, short = 'n', default_value = "10")]
    limit: usize,

    /// Output format: text (default), json
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFormat,
}

/// Execute the favourites command
pub async fn execute(args: FavouritesArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let user = resolve_user(args.user, &config)?;
    let api = create_api(&config).await?;

    let pb = progress::spinner("Fetching favourites...", global.quiet);
    let result = api.favourite_recipes(&user, args.limit).await;
    progress::clear_spinner(pb);

    let recipes = result.with_context(|| format!("Failed to fetch favourites for {}", user))?;

    if recipes.is_empty() {
        if !global.quiet {
            eprintln!("{} has no favourite recipes yet", user);
        }
        return Ok(());
    }

    if args.output == OutputFormat::Text && !global.quiet {
        println!("Favourites of {}:\n", user);
    }
    output_recipes(&recipes, args.output)
}
