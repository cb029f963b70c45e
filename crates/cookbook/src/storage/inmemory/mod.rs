//! In-memory storage backend.
//!
//! Always compiled: it backs the test suite and `--in-memory` runs.

mod repository;

pub use repository::InMemoryStore;
