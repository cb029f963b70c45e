//! Queries the observation bridge can keep live.

use cookbook_core::recipe::{filter_by_owner, Recipe};
use cookbook_core::storage::{LocalStore, Result, StoreChange};

/// A Local Store read that can be re-evaluated after every commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Every recipe, in feed order.
    AllRecipes,
    /// A single recipe by ID.
    RecipeById(String),
    /// Recipes authored by one user, in feed order.
    RecipesByOwner(String),
}

impl Query {
    /// Returns true if `change` could alter this query's result.
    pub fn is_affected_by(&self, change: &StoreChange) -> bool {
        match self {
            Self::AllRecipes | Self::RecipesByOwner(_) => change.touches_recipes(),
            Self::RecipeById(id) => change.touches_recipe(id),
        }
    }

    /// Runs the query against the store.
    ///
    /// `RecipeById` yields zero or one recipe.
    pub async fn evaluate(&self, store: &dyn LocalStore) -> Result<Vec<Recipe>> {
        match self {
            Self::AllRecipes => store.all_recipes().await,
            Self::RecipeById(id) => Ok(store.recipe(id).await?.into_iter().collect()),
            Self::RecipesByOwner(owner) => {
                let all = store.all_recipes().await?;
                Ok(filter_by_owner(&all, owner).into_iter().cloned().collect())
            }
        }
    }
}
