use async_trait::async_trait;
use thiserror::Error;

use crate::recipe::Recipe;

/// Errors from sync cursor persistence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("Cursor I/O error: {0}")]
    Io(String),
    #[error("Cursor serialization error: {0}")]
    Serialization(String),
}

/// Lightweight key-value persistence for the sync cursor.
///
/// Lives outside the record store so a wiped cache and a stale cursor can
/// be reasoned about separately.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Loads the persisted cursor, `None` if nothing was ever saved.
    async fn load(&self) -> Result<Option<i64>, CursorError>;

    /// Persists the cursor.
    async fn save(&self, millis: i64) -> Result<(), CursorError>;
}

/// Computes the next cursor after a successful pull.
///
/// Returns `max(current, max(last_updated))`. Records without a timestamp do
/// not move the cursor, and the result is never below `current`.
pub fn advance_cursor(current: i64, pulled: &[Recipe]) -> i64 {
    pulled
        .iter()
        .filter_map(|recipe| recipe.last_updated)
        .fold(current, i64::max)
}
