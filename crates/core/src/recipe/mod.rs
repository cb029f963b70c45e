mod error;
mod operations;
mod types;

pub use error::RecipeError;
pub use operations::{
    apply_patch, filter_by_owner, sort_feed, validate_recipe, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};
pub use types::{Recipe, RecipePatch, User};
