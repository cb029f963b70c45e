use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::recipe::{Recipe, User};

use super::{Result, StoreChange};

/// Local persistence for recipes.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Returns every stored recipe in feed order.
    async fn all_recipes(&self) -> Result<Vec<Recipe>>;

    /// Gets a recipe by its ID.
    async fn recipe(&self, id: &str) -> Result<Option<Recipe>>;

    /// Inserts the recipe or fully replaces the row with the same ID.
    async fn upsert_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// Upserts a batch of recipes in slice order.
    async fn upsert_recipes(&self, recipes: &[Recipe]) -> Result<()>;

    /// Removes a recipe by its ID. Absent IDs are a no-op.
    async fn delete_recipe(&self, id: &str) -> Result<()>;
}

/// Local persistence for user profiles.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Gets a user by their ID.
    async fn user(&self, id: &str) -> Result<Option<User>>;

    /// Inserts the user or fully replaces the row with the same ID.
    async fn upsert_user(&self, user: &User) -> Result<()>;
}

/// Source of commit notifications.
pub trait ChangeFeed: Send + Sync {
    /// Subscribes to changes committed after this call.
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange>;
}

/// A complete Local Store: recipes, users and a change feed.
pub trait LocalStore: RecipeStore + UserStore + ChangeFeed {}

impl<T: RecipeStore + UserStore + ChangeFeed> LocalStore for T {}
