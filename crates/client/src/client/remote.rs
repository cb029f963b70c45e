//! `RemoteSource` implementation backed by the HTTP API.

use async_trait::async_trait;

use cookbook_core::recipe::{Recipe, User};
use cookbook_core::remote::{RemoteSource, Result};

use super::CookbookClient;

#[async_trait]
impl RemoteSource for CookbookClient {
    async fn fetch_since(&self, since: i64) -> Result<Vec<Recipe>> {
        self.list_recipes_since(since)
            .await
            .map_err(|e| e.into_remote("Recipe", "*"))
    }

    async fn fetch(&self, id: &str) -> Result<Recipe> {
        self.get_recipe(id)
            .await
            .map_err(|e| e.into_remote("Recipe", id))
    }

    async fn create(&self, recipe: &Recipe) -> Result<Recipe> {
        self.create_recipe(recipe)
            .await
            .map_err(|e| e.into_remote("Recipe", &recipe.id))
    }

    async fn update(&self, recipe: &Recipe) -> Result<Recipe> {
        self.update_recipe(recipe)
            .await
            .map_err(|e| e.into_remote("Recipe", &recipe.id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.delete_recipe(id)
            .await
            .map_err(|e| e.into_remote("Recipe", id))
    }

    async fn fetch_user(&self, id: &str) -> Result<User> {
        self.get_user(id)
            .await
            .map_err(|e| e.into_remote("User", id))
    }
}
