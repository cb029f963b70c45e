//! Recipe API operations.

use reqwest::Method;

use super::CookbookClient;
use crate::error::Result;
use cookbook_core::recipe::Recipe;

impl CookbookClient {
    /// List recipes modified at or after `since` (epoch millis).
    pub async fn list_recipes_since(&self, since: i64) -> Result<Vec<Recipe>> {
        let response = self
            .request(Method::GET, "/api/recipes")
            .query(&[("since", since)])
            .send()
            .await?;
        self.handle_response(response, "Recipes").await
    }

    /// Get recipe by ID.
    pub async fn get_recipe(&self, id: &str) -> Result<Recipe> {
        let response = self
            .request(Method::GET, &format!("/api/recipes/{}", id))
            .send()
            .await?;
        self.handle_response(response, &format!("Recipe {}", id))
            .await
    }

    /// Create a recipe. The server stamps `lastUpdated`.
    pub async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe> {
        let response = self
            .request(Method::POST, "/api/recipes")
            .json(recipe)
            .send()
            .await?;
        self.handle_response(response, &format!("Recipe {}", recipe.id))
            .await
    }

    /// Replace a recipe.
    pub async fn update_recipe(&self, recipe: &Recipe) -> Result<Recipe> {
        let response = self
            .request(Method::PUT, &format!("/api/recipes/{}", recipe.id))
            .json(recipe)
            .send()
            .await?;
        self.handle_response(response, &format!("Recipe {}", recipe.id))
            .await
    }

    /// Delete recipe by ID.
    pub async fn delete_recipe(&self, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/api/recipes/{}", id))
            .send()
            .await?;
        self.handle_empty_response(response, &format!("Recipe {}", id))
            .await
    }
}
