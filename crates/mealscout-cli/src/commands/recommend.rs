//! Recommend command - Recipes picked for a user

use anyhow::{Context, Result};
use clap::Args;
use mealscout_client::Recommendation;

use super::{create_api, load_config, resolve_user, OutputFormat};
use crate::progress;
use crate::GlobalOptions;

/// Arguments for the recommend command
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// User to recommend for (defaults to api.user_id)
    #[arg(long, short = 'u')]
    user: Option<String>,

    /// Number of recipes to show
    #[arg(long, short = 'n', default_value = "12")]
    limit: usize,

    /// Output format: text (default), json
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFormat,
}

/// Execute the recommend command
pub async fn execute(args: RecommendArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let user = resolve_user(args.user, &config)?;
    let api = create_api(&config).await?;

    let pb = progress::spinner("Finding recommendations...", global.quiet);
    let result = api.recommended_recipes(&user, args.limit).await;
    progress::clear_spinner(pb);

    let recommendations =
        result.with_context(|| format!("Failed to fetch recommendations for {}", user))?;

    if recommendations.is_empty() {
        if !global.quiet {
            eprintln!("No recommendations for {}", user);
        }
        return Ok(());
    }

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&recommendations)
                .context("Failed to serialize recommendations")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if !global.quiet {
                println!("Recommended for {}:\n", user);
            }
            print_recommendations(&recommendations);
        }
    }

    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation]) {
    let width = recommendations.len().to_string().len();
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{:>width$}. {}  [score {:.2}]",
            i + 1,
            rec.recipe,
            rec.score,
            width = width
        );
    }
}
