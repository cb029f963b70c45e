use async_trait::async_trait;

use crate::recipe::{Recipe, User};

use super::Result;

/// Network-backed, authoritative recipe collection.
///
/// The acting identity belongs to the implementation (a signed-in session),
/// so ownership checks happen server-side without the caller passing it.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Returns every recipe with `last_updated >= since` (epoch millis).
    ///
    /// The bound is inclusive, so the record sitting exactly on the cursor
    /// is delivered again on the next pull.
    async fn fetch_since(&self, since: i64) -> Result<Vec<Recipe>>;

    /// Fetches a single recipe by its ID.
    async fn fetch(&self, id: &str) -> Result<Recipe>;

    /// Creates a recipe. The returned record carries the server timestamp.
    async fn create(&self, recipe: &Recipe) -> Result<Recipe>;

    /// Replaces a recipe owned by the acting identity.
    async fn update(&self, recipe: &Recipe) -> Result<Recipe>;

    /// Deletes a recipe owned by the acting identity.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Fetches a user profile by ID.
    async fn fetch_user(&self, id: &str) -> Result<User>;
}
