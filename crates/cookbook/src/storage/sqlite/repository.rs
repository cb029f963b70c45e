//! SQLite Local Store implementation.
//!
//! Implements the storage traits from `cookbook_core::storage` using SQLite.
//! `tokio_rusqlite` runs every call on one dedicated background thread in
//! submission order, which makes it the store's single writer. Change
//! notifications are published from that thread right after the commit, so
//! subscribers see them in commit order.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_rusqlite::Connection;

use cookbook_core::recipe::{Recipe, User};
use cookbook_core::storage::{
    ChangeFeed, RecipeStore, RepositoryError, Result, StoreChange, UserStore,
};

use super::conversions::{row_to_recipe, row_to_user};
use super::error::map_tokio_rusqlite_error;
use super::schema;
use crate::storage::ChangeNotifier;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based Local Store.
pub struct SqliteStore {
    conn: Connection,
    notifier: ChangeNotifier,
}

impl SqliteStore {
    /// Opens a file-based store.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::debug!(path, "Opened SQLite store");

        Ok(Self {
            conn,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self {
            conn,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

fn upsert_params(recipe: &Recipe) -> [&dyn rusqlite::ToSql; 6] {
    [
        &recipe.id,
        &recipe.title,
        &recipe.description,
        &recipe.image_url,
        &recipe.owner_id,
        &recipe.last_updated,
    ]
}

// ============================================================================
// RecipeStore implementation
// ============================================================================

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn all_recipes(&self) -> Result<Vec<Recipe>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_ALL_RECIPES)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_recipe).map_err(wrap_err)?;

                let mut recipes = Vec::new();
                for row_result in rows {
                    recipes.push(row_result.map_err(wrap_err)?);
                }
                Ok(recipes)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Recipe", "unknown"))
    }

    async fn recipe(&self, id: &str) -> Result<Option<Recipe>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_RECIPE_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_recipe) {
                    Ok(recipe) => Ok(Some(recipe)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Recipe", id))
    }

    async fn upsert_recipe(&self, recipe: &Recipe) -> Result<()> {
        let recipe = recipe.clone();
        let recipe_id = recipe.id.clone();
        let notifier = self.notifier.clone();

        self.conn
            .call(move |conn| {
                conn.execute(schema::UPSERT_RECIPE, upsert_params(&recipe).as_slice())
                    .map_err(wrap_err)?;
                notifier.publish(StoreChange::recipe_upserted(recipe.id));
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Recipe", recipe_id))
    }

    async fn upsert_recipes(&self, recipes: &[Recipe]) -> Result<()> {
        if recipes.is_empty() {
            return Ok(());
        }
        let batch = recipes.to_vec();
        let notifier = self.notifier.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                {
                    let mut stmt = tx
                        .prepare_cached(schema::UPSERT_RECIPE)
                        .map_err(wrap_err)?;
                    for recipe in &batch {
                        stmt.execute(upsert_params(recipe).as_slice())
                            .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;

                notifier.publish(StoreChange::RecipesUpserted {
                    ids: batch.into_iter().map(|r| r.id).collect(),
                });
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Recipe", "unknown"))
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        let id_str = id.to_string();
        let notifier = self.notifier.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_RECIPE, [&id_str])
                    .map_err(wrap_err)?;
                if rows > 0 {
                    notifier.publish(StoreChange::recipe_deleted(id_str));
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Recipe", id))
    }
}

// ============================================================================
// UserStore implementation
// ============================================================================

#[async_trait]
impl UserStore for SqliteStore {
    async fn user(&self, id: &str) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_USER_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id))
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        let user = user.clone();
        let user_id = user.id.clone();
        let notifier = self.notifier.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_USER,
                    rusqlite::params![user.id, user.display_name, user.avatar_url],
                )
                .map_err(wrap_err)?;
                notifier.publish(StoreChange::user_upserted(user.id));
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user_id))
    }
}

impl ChangeFeed for SqliteStore {
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}
