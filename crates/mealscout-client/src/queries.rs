//! GraphQL documents sent to the recipe API.

/// Selection set shared by every recipe query.
macro_rules! recipe_fields {
    () => {
        r#"
            id
            name
            difficulty
            cookingTime
            servingSize
            calories
            cost
            popularityScore
            seasonalAvailability
            ingredients
            cuisine
            allergens
            occasions
            seasons
            preparationSteps
            rating"#
    };
}

pub const SEARCH_RECIPES: &str = concat!(
    "query SearchRecipes($searchTerm: String!, $limit: Int!) {\n",
    "    searchRecipes(searchTerm: $searchTerm, limit: $limit) {",
    recipe_fields!(),
    "\n    }\n}\n"
);

pub const RANDOM_RECIPES: &str = concat!(
    "query GetRandomRecipes($limit: Int!) {\n",
    "    randomRecipes(limit: $limit) {",
    recipe_fields!(),
    "\n    }\n}\n"
);

pub const SIMILAR_RECIPES: &str = concat!(
    "query FindSimilarRecipes($recipeId: String!, $limit: Int!) {\n",
    "    findSimilarRecipes(recipeId: $recipeId, limit: $limit) {",
    recipe_fields!(),
    "\n            favourite",
    "\n    }\n}\n"
);

pub const RECIPE_BY_ID: &str = concat!(
    "query RecipeById($recipeId: String!, $userId: String!) {\n",
    "    recipeById(recipeId: $recipeId, userId: $userId) {",
    recipe_fields!(),
    "\n            favourite",
    "\n    }\n}\n"
);

pub const PERSONALIZED_RECOMMENDATIONS: &str = concat!(
    "query PersonalizedRecommendations($userId: String!, $limit: Int!) {\n",
    "    personalizedRecommendations(userId: $userId, limit: $limit) {\n",
    "        recipe {",
    recipe_fields!(),
    "\n            favourite",
    "\n        }",
    "\n        score",
    "\n    }\n}\n"
);

pub const FAVOURITE_RECIPES: &str = concat!(
    "query UserFavouriteRecipes($userId: String!, $limit: Int!) {\n",
    "    userFavouriteRecipe(userId: $userId, limit: $limit) {",
    recipe_fields!(),
    "\n            favourite",
    "\n    }\n}\n"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_select_all_fields() {
        for document in [
            SEARCH_RECIPES,
            RANDOM_RECIPES,
            SIMILAR_RECIPES,
            RECIPE_BY_ID,
            PERSONALIZED_RECOMMENDATIONS,
            FAVOURITE_RECIPES,
        ] {
            assert!(document.contains("preparationSteps"));
            assert!(document.contains("popularityScore"));
            assert_eq!(document.matches('{').count(), document.matches('}').count());
        }
    }

    #[test]
    fn test_per_user_documents_request_favourite() {
        assert!(RECIPE_BY_ID.contains("favourite"));
        assert!(SIMILAR_RECIPES.contains("favourite"));
        assert!(FAVOURITE_RECIPES.contains("favourite"));
        assert!(PERSONALIZED_RECOMMENDATIONS.contains("favourite"));
        assert!(PERSONALIZED_RECOMMENDATIONS.contains("score"));
        assert!(!SEARCH_RECIPES.contains("favourite"));
    }
}
