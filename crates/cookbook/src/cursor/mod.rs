//! Sync cursor persistence.
//!
//! The cursor is kept apart from the Local Store so wiping the record cache
//! and resetting the cursor stay separate decisions.

mod file;
mod memory;

pub use file::FileCursorStore;
pub use memory::MemoryCursorStore;
