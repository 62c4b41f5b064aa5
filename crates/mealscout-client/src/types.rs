//! Recipe records shared by every API implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How hard a recipe is to prepare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Any value the server sends that this client does not know
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Recipe summary as returned by the search, random and similar queries.
///
/// Field names follow the API's camelCase JSON. Anything the server omits
/// falls back to an empty/zero value.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,

    /// Total cooking time in minutes, possibly fractional
    pub cooking_time: f64,

    pub serving_size: f64,
    pub calories: f64,
    pub cost: f64,
    pub popularity_score: f64,
    pub seasonal_availability: Vec<String>,
    pub ingredients: Vec<String>,
    pub cuisine: String,
    pub allergens: Vec<String>,
    pub occasions: Vec<String>,
    pub seasons: Vec<String>,
    pub preparation_steps: Vec<String>,
    pub rating: f64,

    /// Only present on per-user queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favourite: Option<bool>,
}

/// A recipe recommended for a user, with the server's relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub recipe: RecipeSummary,
    #[serde(default)]
    pub score: f64,
}

impl RecipeSummary {
    /// Create a summary with only identity fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Case-insensitive match against name, cuisine, ingredients and tags.
    ///
    /// An empty term matches every recipe.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&self.name)
            || contains(&self.cuisine)
            || self.ingredients.iter().any(|i| contains(i))
            || self.occasions.iter().any(|o| contains(o))
            || self.seasons.iter().any(|s| contains(s))
    }
}

impl fmt::Display for RecipeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {} min, {:.1}★)",
            self.name, self.cuisine, self.difficulty, self.cooking_time, self.rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_camel_case() {
        let json = serde_json::json!({
            "id": "r1",
            "name": "Chicken Tikka",
            "difficulty": "medium",
            "cookingTime": 45,
            "servingSize": 4,
            "calories": 520.5,
            "cuisine": "Indian",
            "rating": 4.6,
            "preparationSteps": ["Marinate", "Grill"],
            "ingredients": ["chicken", "yoghurt"]
        });

        let recipe: RecipeSummary = serde_json::from_value(json).unwrap();

        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.cooking_time, 45.0);
        assert_eq!(recipe.serving_size, 4.0);
        assert_eq!(recipe.preparation_steps, vec!["Marinate", "Grill"]);
        assert!(recipe.allergens.is_empty());
        assert_eq!(recipe.favourite, None);
    }

    #[test]
    fn test_fractional_counts_decode() {
        let recipe: RecipeSummary = serde_json::from_value(serde_json::json!({
            "id": "r3",
            "name": "Risotto",
            "cookingTime": 12.5,
            "servingSize": 2.5
        }))
        .unwrap();

        assert_eq!(recipe.cooking_time, 12.5);
        assert_eq!(recipe.serving_size, 2.5);
        assert!(recipe.to_string().contains("12.5 min"));
    }

    #[test]
    fn test_recommendation_decode() {
        let rec: Recommendation = serde_json::from_value(serde_json::json!({
            "recipe": { "id": "r4", "name": "Pho", "favourite": false },
            "score": 0.87
        }))
        .unwrap();

        assert_eq!(rec.recipe.name, "Pho");
        assert_eq!(rec.recipe.favourite, Some(false));
        assert_eq!(rec.score, 0.87);
    }

    #[test]
    fn test_unknown_difficulty() {
        let recipe: RecipeSummary =
            serde_json::from_value(serde_json::json!({"id": "r2", "difficulty": "expert"}))
                .unwrap();
        assert_eq!(recipe.difficulty, Difficulty::Unknown);
    }

    #[test]
    fn test_matches() {
        let mut recipe = RecipeSummary::new("r1", "Lemon Chicken");
        recipe.cuisine = "Greek".to_string();
        recipe.ingredients = vec!["Oregano".to_string()];

        assert!(recipe.matches("chicken"));
        assert!(recipe.matches("GREEK"));
        assert!(recipe.matches("oregano"));
        assert!(recipe.matches(""));
        assert!(recipe.matches("   "));
        assert!(!recipe.matches("beef"));
    }

    #[test]
    fn test_display() {
        let mut recipe = RecipeSummary::new("r1", "Pad Thai");
        recipe.cuisine = "Thai".to_string();
        recipe.difficulty = Difficulty::Easy;
        recipe.cooking_time = 25.0;
        recipe.rating = 4.3;

        assert_eq!(recipe.to_string(), "Pad Thai (Thai, easy, 25 min, 4.3★)");
    }
}
