//! MealScout CLI - Recipe discovery from the terminal
//!
//! A command-line interface for searching the recipe catalogue with the same
//! debounced, incrementally loaded search the web client uses.
//!
//! # Usage
//!
//! ```bash
//! # Search and load two extra pages
//! mealscout search chicken --pages 2
//!
//! # Interactive search: type terms, `:more` to load more, `:quit` to exit
//! mealscout search --interactive
//!
//! # Work offline against a JSON catalogue
//! mealscout --fixture recipes.json random -n 5
//!
//! # Recipes picked for the configured user
//! mealscout recommend --user u1
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mealscout_config::{LogFormat, LoggingConfig};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;
mod progress;

/// MealScout - Find recipes from the command line
#[derive(Parser, Debug)]
#[command(name = "mealscout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Path to configuration file
    #[arg(long, short = 'c', global = true, env = "MEALSCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Recipe API GraphQL endpoint
    #[arg(long, global = true, env = "MEALSCOUT_API_ENDPOINT")]
    endpoint: Option<String>,

    /// Serve recipes from a JSON file instead of the API
    #[arg(long, global = true, env = "MEALSCOUT_FIXTURE")]
    fixture: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

impl GlobalOptions {
    /// Convert global options to config overrides
    pub fn to_config_overrides(&self) -> mealscout_config::ConfigOverrides {
        mealscout_config::ConfigOverrides {
            endpoint: self.endpoint.clone(),
            fixture: self.fixture.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search recipes with debounced, incrementally loaded results
    Search(commands::search::SearchArgs),

    /// Show one recipe in detail
    Recipe(commands::recipe::RecipeArgs),

    /// Show a random selection of recipes
    Random(commands::random::RandomArgs),

    /// Show recipes similar to a given recipe
    Similar(commands::similar::SimilarArgs),

    /// Show recipes recommended for a user
    Recommend(commands::recommend::RecommendArgs),

    /// Show a user's favourite recipes
    Favourites(commands::favourites::FavouritesArgs),

    /// View and manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself
    let logging = commands::load_config(&cli.global)
        .map(|config| config.logging)
        .unwrap_or_default();
    init_tracing(&cli.global, &logging)?;

    match cli.command {
        Commands::Search(args) => commands::search::execute(args, cli.global).await,
        Commands::Recipe(args) => commands::recipe::execute(args, cli.global).await,
        Commands::Random(args) => commands::random::execute(args, cli.global).await,
        Commands::Similar(args) => commands::similar::execute(args, cli.global).await,
        Commands::Recommend(args) => commands::recommend::execute(args, cli.global).await,
        Commands::Favourites(args) => commands::favourites::execute(args, cli.global).await,
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global).await,
    }
}

/// Install the stderr subscriber.
///
/// `--quiet` and `--verbose` win over `RUST_LOG`, which wins over
/// `logging.level` from the configuration.
fn init_tracing(global: &GlobalOptions, logging: &LoggingConfig) -> Result<()> {
    let filter = if global.quiet {
        EnvFilter::new(Level::ERROR.as_str())
    } else if global.verbose {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level: Level = logging.level.parse().unwrap_or(Level::INFO);
            EnvFilter::new(level.as_str())
        })
    };

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => {
            tracing::subscriber::set_global_default(builder.with_ansi(true).finish())?
        }
    }

    Ok(())
}
