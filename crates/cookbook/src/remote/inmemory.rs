//! In-memory Remote Source.
//!
//! Simulates the authoritative document collection: a monotonic server
//! clock stamps every write, writes require a signed-in identity and only
//! the owner may change or remove a recipe. Clones and sessions share the
//! same collection, so several users can act against one remote.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use cookbook_core::recipe::{Recipe, User};
use cookbook_core::remote::{RemoteError, RemoteSource, Result};

#[derive(Debug, Default)]
struct RemoteState {
    recipes: HashMap<String, Recipe>,
    users: HashMap<String, User>,
    offline: bool,
    latency: Duration,
    /// Last timestamp handed out, in epoch millis.
    clock: i64,
}

impl RemoteState {
    /// Returns a timestamp strictly greater than any handed out before.
    fn next_timestamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.clock = now.max(self.clock + 1);
        self.clock
    }
}

/// Shared in-memory document store acting as the remote.
#[derive(Debug, Clone)]
pub struct InMemoryRemote {
    state: Arc<RwLock<RemoteState>>,
    identity: Arc<RwLock<Option<String>>>,
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemote {
    /// Creates an empty, online remote with nobody signed in.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RemoteState::default())),
            identity: Arc::new(RwLock::new(None)),
        }
    }

    /// Opens a second session on the same collection, signed in as `user_id`.
    pub fn session(&self, user_id: impl Into<String>) -> Self {
        Self {
            state: Arc::clone(&self.state),
            identity: Arc::new(RwLock::new(Some(user_id.into()))),
        }
    }

    pub async fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        tracing::debug!(user_id = %user_id, "Signed in to remote");
        *self.identity.write().await = Some(user_id);
    }

    pub async fn sign_out(&self) {
        *self.identity.write().await = None;
    }

    /// Simulates losing or regaining connectivity.
    pub async fn set_online(&self, online: bool) {
        self.state.write().await.offline = !online;
    }

    /// Delays every call, useful to exercise in-flight operations.
    pub async fn set_latency(&self, latency: Duration) {
        self.state.write().await.latency = latency;
    }

    /// Stores a recipe as is, bypassing identity checks.
    ///
    /// The server clock moves past the seeded timestamp so later writes
    /// still sort after it.
    pub async fn seed(&self, recipe: Recipe) {
        let mut state = self.state.write().await;
        if let Some(ts) = recipe.last_updated {
            state.clock = state.clock.max(ts);
        }
        state.recipes.insert(recipe.id.clone(), recipe);
    }

    pub async fn seed_user(&self, user: User) {
        let mut state = self.state.write().await;
        state.users.insert(user.id.clone(), user);
    }

    /// Returns the current collection, oldest first.
    pub async fn snapshot(&self) -> Vec<Recipe> {
        let state = self.state.read().await;
        let mut recipes: Vec<Recipe> = state.recipes.values().cloned().collect();
        recipes.sort_by(|a, b| {
            a.last_updated
                .cmp(&b.last_updated)
                .then_with(|| a.id.cmp(&b.id))
        });
        recipes
    }

    async fn simulate_network(&self) -> Result<()> {
        let (offline, latency) = {
            let state = self.state.read().await;
            (state.offline, state.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if offline {
            return Err(RemoteError::Unavailable("remote is offline".to_string()));
        }
        Ok(())
    }

    /// Returns the signed-in user or `Unauthorized` for the target.
    async fn acting_user(&self, recipe_id: &str) -> Result<String> {
        self.identity
            .read()
            .await
            .clone()
            .ok_or_else(|| unauthorized(recipe_id))
    }
}

fn unauthorized(id: &str) -> RemoteError {
    RemoteError::Unauthorized {
        entity_type: "Recipe",
        id: id.to_string(),
    }
}

fn not_found(entity_type: &'static str, id: &str) -> RemoteError {
    RemoteError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

#[async_trait]
impl RemoteSource for InMemoryRemote {
    async fn fetch_since(&self, since: i64) -> Result<Vec<Recipe>> {
        self.simulate_network().await?;
        Ok(self
            .snapshot()
            .await
            .into_iter()
            .filter(|recipe| recipe.last_updated.is_some_and(|ts| ts >= since))
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<Recipe> {
        self.simulate_network().await?;
        let state = self.state.read().await;
        state
            .recipes
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Recipe", id))
    }

    async fn create(&self, recipe: &Recipe) -> Result<Recipe> {
        self.simulate_network().await?;
        let user = self.acting_user(&recipe.id).await?;
        if !recipe.is_owned_by(&user) {
            return Err(unauthorized(&recipe.id));
        }

        let mut state = self.state.write().await;
        if state.recipes.contains_key(&recipe.id) {
            return Err(RemoteError::AlreadyExists {
                entity_type: "Recipe",
                id: recipe.id.clone(),
            });
        }

        let stamped = recipe.clone().with_last_updated(state.next_timestamp());
        state.recipes.insert(stamped.id.clone(), stamped.clone());
        Ok(stamped)
    }

    async fn update(&self, recipe: &Recipe) -> Result<Recipe> {
        self.simulate_network().await?;
        let user = self.acting_user(&recipe.id).await?;

        let mut state = self.state.write().await;
        let existing = state
            .recipes
            .get(&recipe.id)
            .ok_or_else(|| not_found("Recipe", &recipe.id))?;
        if !existing.is_owned_by(&user) || !recipe.is_owned_by(&user) {
            return Err(unauthorized(&recipe.id));
        }

        let stamped = recipe.clone().with_last_updated(state.next_timestamp());
        state.recipes.insert(stamped.id.clone(), stamped.clone());
        Ok(stamped)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.simulate_network().await?;
        let user = self.acting_user(id).await?;

        let mut state = self.state.write().await;
        let existing = state.recipes.get(id).ok_or_else(|| not_found("Recipe", id))?;
        if !existing.is_owned_by(&user) {
            return Err(unauthorized(id));
        }
        state.recipes.remove(id);
        Ok(())
    }

    async fn fetch_user(&self, id: &str) -> Result<User> {
        self.simulate_network().await?;
        let state = self.state.read().await;
        state
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("User", id))
    }
}
