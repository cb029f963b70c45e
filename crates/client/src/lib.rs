//! cookbook_client - HTTP clients for the cookbook remote and recipe catalogue.

pub mod catalog;
pub mod client;
pub mod error;

pub use catalog::{CatalogClient, CatalogRecipe};
pub use client::CookbookClient;
pub use error::{ClientError, Result};
