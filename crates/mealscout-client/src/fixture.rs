//! Offline recipe API backed by a JSON file.
//!
//! The file holds a JSON array of recipe records in the same camelCase shape
//! the GraphQL API returns. Useful for demos and for exercising the search
//! loader without a server.
//!
//! A fixture describes a single user: records with `"favourite": true` are
//! that user's favourites whatever user id is asked for, and
//! recommendations are ranked against them.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::error::ApiError;
use crate::traits::RecipeApi;
use crate::types::{RecipeSummary, Recommendation};

/// Recipe API serving an in-memory catalogue.
#[derive(Debug)]
pub struct FixtureApi {
    recipes: Vec<RecipeSummary>,
    origin: Option<PathBuf>,
    /// Rotates the starting point of `random_recipes`
    cursor: AtomicUsize,
}

impl FixtureApi {
    /// Serve the given recipes in the given order.
    pub fn new(recipes: Vec<RecipeSummary>) -> Self {
        Self {
            recipes,
            origin: None,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Load a catalogue from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::fixture(path, e.to_string()))?;

        let recipes: Vec<RecipeSummary> =
            serde_json::from_str(&content).map_err(|e| ApiError::fixture(path, e.to_string()))?;

        debug!("Loaded {} recipes from {:?}", recipes.len(), path);

        Ok(Self {
            recipes,
            origin: Some(path.to_path_buf()),
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of recipes in the catalogue.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn favourites(&self) -> impl Iterator<Item = &RecipeSummary> {
        self.recipes.iter().filter(|r| r.favourite == Some(true))
    }
}

#[async_trait]
impl RecipeApi for FixtureApi {
    async fn search_recipes(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| recipe.matches(term))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn random_recipes(&self, limit: usize) -> Result<Vec<RecipeSummary>, ApiError> {
        if self.recipes.is_empty() {
            return Ok(Vec::new());
        }

        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % self.recipes.len();
        Ok(self
            .recipes
            .iter()
            .cycle()
            .skip(start)
            .take(limit.min(self.recipes.len()))
            .cloned()
            .collect())
    }

    async fn similar_recipes(
        &self,
        recipe_id: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let target = self
            .recipes
            .iter()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| ApiError::not_found(recipe_id))?;

        let shared = |other: &RecipeSummary| {
            other
                .ingredients
                .iter()
                .filter(|i| target.ingredients.contains(i))
                .count()
        };

        let mut candidates: Vec<(usize, &RecipeSummary)> = self
            .recipes
            .iter()
            .filter(|r| r.id != target.id)
            .filter(|r| r.cuisine == target.cuisine || shared(r) > 0)
            .map(|r| (shared(r), r))
            .collect();

        // Stable sort keeps catalogue order among equal scores
        candidates.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(candidates
            .into_iter()
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn recipe_by_id(
        &self,
        recipe_id: &str,
        _user_id: &str,
    ) -> Result<RecipeSummary, ApiError> {
        let mut recipe = self
            .recipes
            .iter()
            .find(|r| r.id == recipe_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(recipe_id))?;

        recipe.favourite.get_or_insert(false);
        Ok(recipe)
    }

    async fn recommended_recipes(
        &self,
        _user_id: &str,
        limit: usize,
    ) -> Result<Vec<Recommendation>, ApiError> {
        let favourites: Vec<&RecipeSummary> = self.favourites().collect();

        // One point per ingredient or cuisine shared with a favourite, plus
        // the rating scaled into [0, 1] to order the rest
        let score = |recipe: &RecipeSummary| {
            let affinity: usize = favourites
                .iter()
                .map(|fav| {
                    let shared = recipe
                        .ingredients
                        .iter()
                        .filter(|i| fav.ingredients.contains(i))
                        .count();
                    shared + usize::from(recipe.cuisine == fav.cuisine)
                })
                .sum();
            affinity as f64 + recipe.rating / 5.0
        };

        let mut ranked: Vec<Recommendation> = self
            .recipes
            .iter()
            .filter(|r| r.favourite != Some(true))
            .map(|r| Recommendation {
                score: score(r),
                recipe: r.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn favourite_recipes(
        &self,
        _user_id: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        Ok(self.favourites().take(limit).cloned().collect())
    }

    fn source(&self) -> String {
        match self.origin {
            Some(ref path) => format!("fixture {}", path.display()),
            None => "in-memory fixture".to_string(),
        }
    }
}
