//! Sync coordinator.
//!
//! `RecipeRepository` is the single entry point the presentation layer talks
//! to. Reads are served from the Local Store, writes go to the Remote Source
//! first and are mirrored locally only once the remote accepted them, and
//! `refresh` pulls remote changes since the persisted cursor.

use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use cookbook_core::recipe::{validate_recipe, Recipe, User};
use cookbook_core::remote::{RemoteError, RemoteSource};
use cookbook_core::storage::LocalStore;
use cookbook_core::sync::{advance_cursor, CursorStore, RefreshReport, Result, SyncError};

use crate::observe::{self, LiveQuery, Query};

/// Offline-first recipe repository.
///
/// Cheap to clone; clones share the same stores, cursor and sync lock.
#[derive(Clone)]
pub struct RecipeRepository {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteSource>,
    cursors: Arc<dyn CursorStore>,
    /// Last persisted cursor, epoch millis.
    cursor: AtomicI64,
    /// Held by a refresh from pull to commit and by every write from remote
    /// call to mirror, so a pulled batch never lands on top of a newer write.
    sync_lock: Mutex<()>,
}

impl RecipeRepository {
    /// Builds the repository and loads the persisted cursor.
    ///
    /// A missing cursor starts the first refresh from the epoch.
    pub async fn new(
        store: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteSource>,
        cursors: Arc<dyn CursorStore>,
    ) -> Result<Self> {
        let cursor = cursors.load().await?.unwrap_or(0);
        tracing::debug!(cursor, "Loaded sync cursor");

        Ok(Self {
            inner: Arc::new(Inner {
                store,
                remote,
                cursors,
                cursor: AtomicI64::new(cursor),
                sync_lock: Mutex::new(()),
            }),
        })
    }

    /// The last persisted sync cursor.
    pub fn cursor(&self) -> i64 {
        self.inner.cursor.load(Ordering::SeqCst)
    }

    /// Live view of every cached recipe. Never touches the network.
    pub fn observe_all(&self) -> LiveQuery<Vec<Recipe>> {
        observe::watch_recipes(Arc::clone(&self.inner.store), Query::AllRecipes)
    }

    /// Live view of one cached recipe.
    pub fn observe_by_id(&self, id: impl Into<String>) -> LiveQuery<Option<Recipe>> {
        observe::watch_recipe(Arc::clone(&self.inner.store), id)
    }

    /// Live view of the cached recipes authored by `owner_id`.
    pub fn observe_by_owner(&self, owner_id: impl Into<String>) -> LiveQuery<Vec<Recipe>> {
        observe::watch_recipes(
            Arc::clone(&self.inner.store),
            Query::RecipesByOwner(owner_id.into()),
        )
    }

    /// One-shot read of every cached recipe.
    pub async fn all_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.inner.store.all_recipes().await?)
    }

    /// Pulls every remote change since the cursor into the Local Store.
    ///
    /// Concurrent calls run one after the other, and writes wait for an
    /// in-flight refresh to commit before mirroring. On a remote failure
    /// nothing changes locally. On a local failure part of the batch may be
    /// stored but the cursor stays put, so the next refresh converges.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let inner = Arc::clone(&self.inner);
        run_to_completion(async move { inner.refresh().await }).await
    }

    /// Creates a recipe on the remote, then mirrors the stamped record.
    pub async fn create(&self, recipe: &Recipe) -> Result<Recipe> {
        validate_recipe(recipe)?;
        let inner = Arc::clone(&self.inner);
        let recipe = recipe.clone();

        run_to_completion(async move {
            let _guard = inner.sync_lock.lock().await;
            let created = inner.remote.create(&recipe).await.map_err(|e| {
                tracing::warn!(recipe_id = %recipe.id, error = %e, "Remote create failed");
                e
            })?;
            inner.store.upsert_recipe(&created).await?;
            tracing::info!(recipe_id = %created.id, "Created recipe");
            Ok(created)
        })
        .await
    }

    /// Replaces a recipe on the remote, then mirrors the re-stamped record.
    pub async fn update(&self, recipe: &Recipe) -> Result<Recipe> {
        validate_recipe(recipe)?;
        let inner = Arc::clone(&self.inner);
        let recipe = recipe.clone();

        run_to_completion(async move {
            let _guard = inner.sync_lock.lock().await;
            let updated = inner.remote.update(&recipe).await.map_err(|e| {
                tracing::warn!(recipe_id = %recipe.id, error = %e, "Remote update failed");
                e
            })?;
            inner.store.upsert_recipe(&updated).await?;
            tracing::info!(recipe_id = %updated.id, "Updated recipe");
            Ok(updated)
        })
        .await
    }

    /// Deletes a recipe on the remote, then drops the local copy.
    pub async fn delete(&self, recipe: &Recipe) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let id = recipe.id.clone();

        run_to_completion(async move {
            let _guard = inner.sync_lock.lock().await;
            inner.remote.delete(&id).await.map_err(|e| {
                tracing::warn!(recipe_id = %id, error = %e, "Remote delete failed");
                e
            })?;
            inner.store.delete_recipe(&id).await?;
            tracing::info!(recipe_id = %id, "Deleted recipe");
            Ok(())
        })
        .await
    }

    /// Local lookup with a single remote fallback on a miss.
    ///
    /// A record found remotely is mirrored into the Local Store without
    /// touching the cursor.
    pub async fn recipe(&self, id: &str) -> Result<Option<Recipe>> {
        if let Some(recipe) = self.inner.store.recipe(id).await? {
            tracing::trace!(recipe_id = %id, "Local hit for recipe");
            return Ok(Some(recipe));
        }

        tracing::trace!(recipe_id = %id, "Local miss for recipe, asking remote");
        let _guard = self.inner.sync_lock.lock().await;
        match self.inner.remote.fetch(id).await {
            Ok(recipe) => {
                self.inner.store.upsert_recipe(&recipe).await?;
                Ok(Some(recipe))
            }
            Err(RemoteError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Same local-first policy as [`recipe`](Self::recipe), for profiles.
    pub async fn user(&self, id: &str) -> Result<Option<User>> {
        if let Some(user) = self.inner.store.user(id).await? {
            tracing::trace!(user_id = %id, "Local hit for user");
            return Ok(Some(user));
        }

        match self.inner.remote.fetch_user(id).await {
            Ok(user) => {
                self.inner.store.upsert_user(&user).await?;
                Ok(Some(user))
            }
            Err(RemoteError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Inner {
    async fn refresh(&self) -> Result<RefreshReport> {
        let _guard = self.sync_lock.lock().await;
        let cursor_before = self.cursor.load(Ordering::SeqCst);

        let pulled = self
            .remote
            .fetch_since(cursor_before)
            .await
            .map_err(|e| {
                tracing::warn!(cursor = cursor_before, error = %e, "Refresh pull failed");
                e
            })?;

        self.store.upsert_recipes(&pulled).await?;

        let cursor_after = advance_cursor(cursor_before, &pulled);
        if cursor_after != cursor_before {
            self.cursors.save(cursor_after).await?;
            self.cursor.store(cursor_after, Ordering::SeqCst);
        }

        tracing::info!(
            fetched = pulled.len(),
            cursor_before,
            cursor_after,
            "Refreshed recipes"
        );
        Ok(RefreshReport {
            fetched: pulled.len(),
            cursor_before,
            cursor_after,
        })
    }
}

/// Runs `operation` on its own task so it finishes even if the caller
/// stops waiting. Only delivery of the result is lost then.
async fn run_to_completion<T, F>(operation: F) -> Result<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    match tokio::spawn(operation).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        // Only happens while the runtime shuts down.
        Err(e) => Err(SyncError::RemoteUnavailable(format!("operation cancelled: {e}"))),
    }
}
