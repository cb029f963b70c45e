//! Local Store backends.
//!
//! This module provides concrete implementations of the storage traits
//! defined in `cookbook_core::storage`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): durable SQLite store using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory store is always available.

mod notifier;

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryStore;
pub use notifier::ChangeNotifier;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
