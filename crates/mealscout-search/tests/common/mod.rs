//! Common test utilities for mealscout-search integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mealscout_client::{ApiError, RecipeApi, RecipeSummary, Recommendation};

/// Message returned by scripted failures.
pub const FAILURE_MESSAGE: &str = "upstream timeout";

/// Recipe API whose match counts, latency and failures are set per term.
#[derive(Default)]
pub struct ScriptedApi {
    totals: Mutex<HashMap<String, usize>>,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<HashSet<(String, usize)>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// `term` matches `total` recipes.
    pub fn with_total(self, term: &str, total: usize) -> Self {
        self.set_total(term, total);
        self
    }

    pub fn with_delay(self, term: &str, delay: Duration) -> Self {
        self.set_delay(term, delay);
        self
    }

    pub fn set_total(&self, term: &str, total: usize) {
        self.totals.lock().unwrap().insert(term.to_string(), total);
    }

    pub fn set_delay(&self, term: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(term.to_string(), delay);
    }

    /// The next request for exactly (`term`, `size`) fails once.
    pub fn fail_once(&self, term: &str, size: usize) {
        self.failures
            .lock()
            .unwrap()
            .insert((term.to_string(), size));
    }

    /// Every search request received, in order.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    /// Requested sizes for one term, in order.
    pub fn sizes_for(&self, term: &str) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter(|(t, _)| t == term)
            .map(|(_, size)| size)
            .collect()
    }
}

#[async_trait]
impl RecipeApi for ScriptedApi {
    async fn search_recipes(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        self.calls.lock().unwrap().push((term.to_string(), limit));

        let delay = self.delays.lock().unwrap().get(term).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self
            .failures
            .lock()
            .unwrap()
            .remove(&(term.to_string(), limit))
        {
            return Err(ApiError::graphql(FAILURE_MESSAGE));
        }

        let total = self.totals.lock().unwrap().get(term).copied().unwrap_or(0);
        Ok((0..total.min(limit))
            .map(|i| RecipeSummary::new(format!("{term}-{i}"), format!("{term} recipe {i}")))
            .collect())
    }

    async fn random_recipes(&self, _limit: usize) -> Result<Vec<RecipeSummary>, ApiError> {
        Ok(Vec::new())
    }

    async fn similar_recipes(
        &self,
        recipe_id: &str,
        _limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        Err(ApiError::not_found(recipe_id))
    }

    async fn recipe_by_id(
        &self,
        recipe_id: &str,
        _user_id: &str,
    ) -> Result<RecipeSummary, ApiError> {
        Err(ApiError::not_found(recipe_id))
    }

    async fn recommended_recipes(
        &self,
        _user_id: &str,
        _limit: usize,
    ) -> Result<Vec<Recommendation>, ApiError> {
        Ok(Vec::new())
    }

    async fn favourite_recipes(
        &self,
        _user_id: &str,
        _limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        Ok(Vec::new())
    }

    fn source(&self) -> String {
        "scripted".to_string()
    }
}
