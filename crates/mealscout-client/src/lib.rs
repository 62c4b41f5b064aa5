//! MealScout Client - Access to the remote recipe catalogue
//!
//! This crate provides a unified interface for reading recipes:
//! - Incremental recipe search (term + result-count limit)
//! - Random and similar recipe selections
//! - Recipe detail lookup for a user
//! - Per-user recommendations and favourites
//!
//! ## API Implementations
//!
//! - [`GraphqlClient`]: GraphQL-over-HTTP client for the recipe server
//! - [`FixtureApi`]: Offline catalogue loaded from a JSON file
//!
//! ## Example
//!
//! ```ignore
//! use mealscout_client::{connect, RecipeApi};
//! use mealscout_config::ScoutConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScoutConfig::default();
//!     let api = connect(&config.api).await?;
//!     let recipes = api.search_recipes("chicken", 12).await?;
//!     println!("{} recipes", recipes.len());
//!     Ok(())
//! }
//! ```

mod error;
mod fixture;
mod graphql;
mod queries;
mod traits;
mod types;

use std::sync::Arc;

use mealscout_config::ApiConfig;
use tracing::info;

pub use error::ApiError;
pub use fixture::FixtureApi;
pub use graphql::GraphqlClient;
pub use traits::RecipeApi;
pub use types::{Difficulty, RecipeSummary, Recommendation};

/// Result type for recipe API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Build the API selected by the `[api]` configuration.
///
/// A configured fixture file takes precedence over the remote endpoint.
pub async fn connect(config: &ApiConfig) -> Result<Arc<dyn RecipeApi>> {
    let api: Arc<dyn RecipeApi> = match config.fixture {
        Some(ref path) => Arc::new(FixtureApi::load(path).await?),
        None => Arc::new(GraphqlClient::from_config(config)?),
    };

    info!("Using recipe source: {}", api.source());
    Ok(api)
}
