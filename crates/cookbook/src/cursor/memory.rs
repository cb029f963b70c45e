//! In-memory cursor store.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use cookbook_core::sync::{CursorError, CursorStore};

const UNSET: i64 = i64::MIN;

/// Cursor store that lives only as long as the process.
///
/// Clones share the same value.
#[derive(Debug, Clone)]
pub struct MemoryCursorStore {
    millis: Arc<AtomicI64>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(UNSET)),
        }
    }

    /// Starts from an already persisted cursor.
    pub fn with_cursor(millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
        }
    }
}

impl Default for MemoryCursorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn load(&self) -> Result<Option<i64>, CursorError> {
        let millis = self.millis.load(Ordering::SeqCst);
        Ok((millis != UNSET).then_some(millis))
    }

    async fn save(&self, millis: i64) -> Result<(), CursorError> {
        self.millis.store(millis, Ordering::SeqCst);
        Ok(())
    }
}
