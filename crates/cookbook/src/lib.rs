//! cookbook - offline-first recipe sharing.
//!
//! - `storage`: Local Store backends (SQLite, in-memory) with commit notifications
//! - `remote`: in-memory Remote Source used by tests and offline demos
//! - `cursor`: sync cursor persistence
//! - `observe`: live queries over the Local Store
//! - `repository`: the sync coordinator the presentation layer talks to

pub mod cli;
pub mod config;
pub mod cursor;
pub mod observe;
pub mod output;
pub mod remote;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use observe::{LiveQuery, Query, Subscription};
pub use repository::RecipeRepository;
