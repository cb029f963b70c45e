mod cursor;
mod error;
mod types;

pub use cursor::{advance_cursor, CursorError, CursorStore};
pub use error::{Result, SyncError};
pub use types::RefreshReport;
