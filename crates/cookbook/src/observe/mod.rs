//! Observation bridge.
//!
//! Turns Local Store commit notifications into live query results. Each
//! registered [`Query`] gets its own bridge task that evaluates the query
//! once, then again after every commit that could change the result.

mod live;
mod query;

use std::sync::Arc;

use cookbook_core::recipe::Recipe;
use cookbook_core::storage::LocalStore;

pub use live::{LiveQuery, Subscription};
pub use query::Query;

/// Keeps a list-shaped query live.
pub fn watch_recipes(store: Arc<dyn LocalStore>, query: Query) -> LiveQuery<Vec<Recipe>> {
    LiveQuery::spawn(store, query, |recipes| recipes)
}

/// Keeps a single recipe live. Delivers `None` while it is absent.
pub fn watch_recipe(store: Arc<dyn LocalStore>, id: impl Into<String>) -> LiveQuery<Option<Recipe>> {
    LiveQuery::spawn(store, Query::RecipeById(id.into()), |recipes| {
        recipes.into_iter().next()
    })
}
