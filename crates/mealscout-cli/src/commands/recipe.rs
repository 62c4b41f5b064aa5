//! Recipe command - Show one recipe in detail

use anyhow::{Context, Result};
use clap::Args;
use mealscout_client::RecipeSummary;

use super::{create_api, load_config, resolve_user, OutputFormat};
use crate::progress;
use crate::GlobalOptions;

/// Arguments for the recipe command
#[derive(Args, Debug)]
pub struct RecipeArgs {
    /// Recipe identifier
    id: String,

    /// User whose favourite flag is shown (defaults to api.user_id)
    #[arg(long, short = 'u')]
    user: Option<String>,

    /// Output format: text (default), json
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFormat,
}

/// Execute the recipe command
pub async fn execute(args: RecipeArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let user = resolve_user(args.user, &config)?;

    let api = create_api(&config).await?;

    let pb = progress::spinner("Fetching recipe...", global.quiet);
    let recipe = match api.recipe_by_id(&args.id, &user).await {
        Ok(recipe) => {
            progress::clear_spinner(pb);
            recipe
        }
        Err(e) => {
            progress::finish_spinner_error(pb, "Could not fetch recipe");
            return Err(e).with_context(|| format!("Failed to fetch recipe {}", args.id));
        }
    };

    match args.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&recipe).context("Failed to serialize recipe")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_details(&recipe),
    }

    Ok(())
}

fn print_details(recipe: &RecipeSummary) {
    let favourite = if recipe.favourite == Some(true) {
        " ♥"
    } else {
        ""
    };
    println!("{}{}", recipe.name, favourite);
    println!("{}", "=".repeat(recipe.name.chars().count()));
    println!();

    println!("  Cuisine:     {}", recipe.cuisine);
    println!("  Difficulty:  {}", recipe.difficulty);
    println!("  Time:        {} min", recipe.cooking_time);
    println!("  Serves:      {}", recipe.serving_size);
    println!("  Calories:    {:.0}", recipe.calories);
    println!("  Cost:        {:.2}", recipe.cost);
    println!("  Rating:      {:.1}", recipe.rating);

    print_list("Occasions", &recipe.occasions);
    print_list("Seasons", &recipe.seasons);
    print_list("Allergens", &recipe.allergens);

    if !recipe.ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &recipe.ingredients {
            println!("  - {}", ingredient);
        }
    }

    if !recipe.preparation_steps.is_empty() {
        println!("\nPreparation:");
        for (i, step) in recipe.preparation_steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("  {:<12} {}", format!("{}:", label), items.join(", "));
    }
}
