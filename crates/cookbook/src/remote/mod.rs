//! Remote Source backends that live in this crate.
//!
//! The HTTP backend is `cookbook_client::CookbookClient`.

mod inmemory;

pub use inmemory::InMemoryRemote;
