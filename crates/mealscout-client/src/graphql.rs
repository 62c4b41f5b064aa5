//! GraphQL-over-HTTP recipe API client.
//!
//! # Endpoint Format
//!
//! - POST `{endpoint}` with `Authorization: Bearer {token}` when a token is set
//! - Request: `{"query": "...", "variables": {...}}`
//! - Response: `{"data": {"searchRecipes": [...]}, "errors": [{"message": "..."}]}`
//!
//! A non-empty `errors` array wins over any partial `data`.

use std::time::Duration;

use async_trait::async_trait;
use mealscout_config::ApiConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::queries;
use crate::traits::RecipeApi;
use crate::types::{RecipeSummary, Recommendation};

/// Default timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Recipe API client speaking GraphQL over HTTP.
#[derive(Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    timeout_secs: u64,
}

impl GraphqlClient {
    /// Create a client for `endpoint` with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ApiError> {
        Self::build(endpoint.into(), None, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client from the `[api]` configuration section.
    ///
    /// The bearer token is read from the configured environment variable.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::build(config.endpoint.clone(), config.token(), config.timeout_secs)
    }

    fn build(endpoint: String, token: Option<String>, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::connection(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            token,
            timeout_secs,
        })
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one GraphQL operation and decode the top-level `field` of `data`.
    async fn execute<T>(&self, query: &str, variables: Value, field: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let body = GraphqlRequest { query, variables };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        debug!(field, endpoint = %self.endpoint, "Sending GraphQL request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(field, status = status.as_u16(), "Recipe API request failed");
            return Err(ApiError::http(status.as_u16(), text));
        }

        let text = response.text().await?;
        let payload: GraphqlResponse = serde_json::from_str(&text)?;

        if let Some(first) = payload.errors.into_iter().next() {
            warn!(field, message = %first.message, "Recipe API returned GraphQL error");
            return Err(ApiError::graphql(first.message));
        }

        let value = payload
            .data
            .and_then(|mut data| data.get_mut(field).map(Value::take))
            .ok_or_else(|| ApiError::missing_data(field))?;

        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl RecipeApi for GraphqlClient {
    async fn search_recipes(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        self.execute(
            queries::SEARCH_RECIPES,
            json!({ "searchTerm": term, "limit": limit }),
            "searchRecipes",
        )
        .await
    }

    async fn random_recipes(&self, limit: usize) -> Result<Vec<RecipeSummary>, ApiError> {
        self.execute(
            queries::RANDOM_RECIPES,
            json!({ "limit": limit }),
            "randomRecipes",
        )
        .await
    }

    async fn similar_recipes(
        &self,
        recipe_id: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        self.execute(
            queries::SIMILAR_RECIPES,
            json!({ "recipeId": recipe_id, "limit": limit }),
            "findSimilarRecipes",
        )
        .await
    }

    async fn recipe_by_id(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> Result<RecipeSummary, ApiError> {
        let recipe: Option<RecipeSummary> = self
            .execute(
                queries::RECIPE_BY_ID,
                json!({ "recipeId": recipe_id, "userId": user_id }),
                "recipeById",
            )
            .await?;

        recipe.ok_or_else(|| ApiError::not_found(recipe_id))
    }

    async fn recommended_recipes(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Recommendation>, ApiError> {
        self.execute(
            queries::PERSONALIZED_RECOMMENDATIONS,
            json!({ "userId": user_id, "limit": limit }),
            "personalizedRecommendations",
        )
        .await
    }

    async fn favourite_recipes(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        self.execute(
            queries::FAVOURITE_RECIPES,
            json!({ "userId": user_id, "limit": limit }),
            "userFavouriteRecipe",
        )
        .await
    }

    fn source(&self) -> String {
        self.endpoint.clone()
    }
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .field("has_token", &self.token.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
