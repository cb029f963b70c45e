use serde::{Deserialize, Serialize};

/// A committed Local Store mutation.
///
/// Published once per mutating call, after the write is durable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreChange {
    /// One or more recipes were inserted or replaced.
    RecipesUpserted { ids: Vec<String> },
    /// A recipe was removed.
    RecipeDeleted { id: String },
    /// A user profile was inserted or replaced.
    UserUpserted { id: String },
}

impl StoreChange {
    /// Creates a change for a single upserted recipe.
    pub fn recipe_upserted(id: impl Into<String>) -> Self {
        Self::RecipesUpserted {
            ids: vec![id.into()],
        }
    }

    /// Creates a change for a removed recipe.
    pub fn recipe_deleted(id: impl Into<String>) -> Self {
        Self::RecipeDeleted { id: id.into() }
    }

    /// Creates a change for an upserted user.
    pub fn user_upserted(id: impl Into<String>) -> Self {
        Self::UserUpserted { id: id.into() }
    }

    /// Returns true if the recipes table changed.
    pub fn touches_recipes(&self) -> bool {
        !matches!(self, Self::UserUpserted { .. })
    }

    /// Returns true if the recipe with `id` was written or removed.
    pub fn touches_recipe(&self, id: &str) -> bool {
        match self {
            Self::RecipesUpserted { ids } => ids.iter().any(|changed| changed == id),
            Self::RecipeDeleted { id: deleted } => deleted == id,
            Self::UserUpserted { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_recipe_matches_ids() {
        let change = StoreChange::RecipesUpserted {
            ids: vec!["r1".to_string(), "r2".to_string()],
        };

        assert!(change.touches_recipe("r1"));
        assert!(change.touches_recipe("r2"));
        assert!(!change.touches_recipe("r3"));
        assert!(change.touches_recipes());
    }

    #[test]
    fn test_delete_touches_only_deleted_id() {
        let change = StoreChange::recipe_deleted("r1");

        assert!(change.touches_recipe("r1"));
        assert!(!change.touches_recipe("r2"));
        assert!(change.touches_recipes());
    }

    #[test]
    fn test_user_change_never_touches_recipes() {
        let change = StoreChange::user_upserted("r1");

        assert!(!change.touches_recipes());
        assert!(!change.touches_recipe("r1"));
    }
}
