//! Recipe API trait definition.
//!
//! Defines the async interface the search loader and CLI talk to.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{RecipeSummary, Recommendation};

/// Read access to the remote recipe catalogue.
///
/// Implemented by the GraphQL client and by the fixture-backed offline API.
/// Results are returned in server order; callers never reorder them.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Search recipes matching `term`, returning at most `limit` entries.
    ///
    /// An empty term is passed through unchanged; the server decides what it
    /// means.
    async fn search_recipes(&self, term: &str, limit: usize)
        -> Result<Vec<RecipeSummary>, ApiError>;

    /// A random selection of at most `limit` recipes.
    async fn random_recipes(&self, limit: usize) -> Result<Vec<RecipeSummary>, ApiError>;

    /// Recipes the server considers similar to `recipe_id`.
    async fn similar_recipes(
        &self,
        recipe_id: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError>;

    /// Full record for one recipe, including the user's favourite flag.
    async fn recipe_by_id(&self, recipe_id: &str, user_id: &str)
        -> Result<RecipeSummary, ApiError>;

    /// Recipes picked for `user_id`, best match first, each with the
    /// server's relevance score.
    async fn recommended_recipes(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Recommendation>, ApiError>;

    /// Recipes `user_id` has marked as favourite.
    async fn favourite_recipes(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError>;

    /// Short description of where recipes come from, for logs and status output.
    fn source(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The loader stores the API as `Arc<dyn RecipeApi>`
    fn _assert_object_safe(_: &dyn RecipeApi) {}
}
