//! In-memory Local Store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use cookbook_core::recipe::{sort_feed, Recipe, User};
use cookbook_core::storage::{ChangeFeed, RecipeStore, Result, StoreChange, UserStore};

use crate::storage::ChangeNotifier;

/// In-memory Local Store.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Changes are published while the write lock is still held, so
/// subscribers observe them in commit order.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    recipes: Arc<RwLock<HashMap<String, Recipe>>>,
    users: Arc<RwLock<HashMap<String, User>>>,
    notifier: ChangeNotifier,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            recipes: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
            notifier: ChangeNotifier::new(),
        }
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn all_recipes(&self) -> Result<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        let mut all: Vec<Recipe> = recipes.values().cloned().collect();
        sort_feed(&mut all);
        Ok(all)
    }

    async fn recipe(&self, id: &str) -> Result<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.get(id).cloned())
    }

    async fn upsert_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut recipes = self.recipes.write().await;
        recipes.insert(recipe.id.clone(), recipe.clone());
        self.notifier
            .publish(StoreChange::recipe_upserted(recipe.id.clone()));
        Ok(())
    }

    async fn upsert_recipes(&self, batch: &[Recipe]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut recipes = self.recipes.write().await;
        for recipe in batch {
            recipes.insert(recipe.id.clone(), recipe.clone());
        }
        self.notifier.publish(StoreChange::RecipesUpserted {
            ids: batch.iter().map(|r| r.id.clone()).collect(),
        });
        Ok(())
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        let mut recipes = self.recipes.write().await;
        if recipes.remove(id).is_some() {
            self.notifier.publish(StoreChange::recipe_deleted(id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn user(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        self.notifier
            .publish(StoreChange::user_upserted(user.id.clone()));
        Ok(())
    }
}

impl ChangeFeed for InMemoryStore {
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}
