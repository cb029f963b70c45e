use std::cmp::Ordering;

use super::error::RecipeError;
use super::types::{Recipe, RecipePatch};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 120;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

const IMAGE_URL_SCHEMES: [&str; 3] = ["http://", "https://", "gs://"];

/// Filters recipes authored by `owner_id`.
pub fn filter_by_owner<'a>(recipes: &'a [Recipe], owner_id: &str) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|recipe| recipe.owner_id == owner_id)
        .collect()
}

/// Sorts recipes in feed order.
///
/// Records the remote has not stamped yet come first, then newest
/// `last_updated` first. Ties are broken by id so the order is total.
pub fn sort_feed(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| match (a.last_updated, b.last_updated) {
        (None, None) => a.id.cmp(&b.id),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.id.cmp(&b.id)),
    });
}

/// Applies a partial edit, returning the edited copy.
pub fn apply_patch(recipe: &Recipe, patch: RecipePatch) -> Recipe {
    let mut edited = recipe.clone();
    if let Some(title) = patch.title {
        edited.title = title;
    }
    if let Some(description) = patch.description {
        edited.description = description;
    }
    if let Some(image_url) = patch.image_url {
        edited.image_url = Some(image_url);
    }
    edited
}

/// Validates a recipe before it is sent to the remote.
pub fn validate_recipe(recipe: &Recipe) -> Result<(), RecipeError> {
    if recipe.title.trim().is_empty() {
        return Err(RecipeError::EmptyTitle);
    }
    if recipe.title.chars().count() > MAX_TITLE_LEN {
        return Err(RecipeError::TitleTooLong);
    }
    if recipe.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(RecipeError::DescriptionTooLong);
    }
    if recipe.owner_id.trim().is_empty() {
        return Err(RecipeError::MissingOwner);
    }
    if let Some(url) = &recipe.image_url {
        if !IMAGE_URL_SCHEMES
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            return Err(RecipeError::InvalidImageUrl(url.clone()));
        }
    }
    Ok(())
}
