use thiserror::Error;

/// Errors raised when a recipe fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("Recipe title cannot be empty")]
    EmptyTitle,
    #[error("Recipe title too long (max 120 characters)")]
    TitleTooLong,
    #[error("Recipe description too long (max 10000 characters)")]
    DescriptionTooLong,
    #[error("Recipe owner is required")]
    MissingOwner,
    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_error_display() {
        assert_eq!(
            RecipeError::EmptyTitle.to_string(),
            "Recipe title cannot be empty"
        );
        assert_eq!(
            RecipeError::InvalidImageUrl("ftp://x".to_string()).to_string(),
            "Invalid image URL: ftp://x"
        );
    }
}
