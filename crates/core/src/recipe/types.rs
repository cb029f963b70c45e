use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shared recipe.
///
/// The wire format uses camelCase field names to match the remote document
/// collection (`imageUrl`, `ownerId`, `lastUpdated`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Client-generated, globally unique identifier.
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Author of the recipe. Immutable after creation.
    pub owner_id: String,
    /// Server-assigned modification time in epoch milliseconds.
    /// `None` until the remote has confirmed the record.
    #[serde(default)]
    pub last_updated: Option<i64>,
}

impl Recipe {
    /// Creates a new, not yet synchronized recipe with a fresh identifier.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            image_url: None,
            owner_id: owner_id.into(),
            last_updated: None,
        }
    }

    /// Sets the image reference for this recipe.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Sets a specific ID for this recipe (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the modification timestamp (epoch millis).
    pub fn with_last_updated(mut self, millis: i64) -> Self {
        self.last_updated = Some(millis);
        self
    }

    /// Returns true once the remote has stamped this record.
    pub fn is_synced(&self) -> bool {
        self.last_updated.is_some()
    }

    /// Returns true if `user_id` is the author of this recipe.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Matches the authentication identity.
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Creates a user without an avatar.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    /// Sets the avatar reference for this user.
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}

/// Partial edit of a recipe's mutable fields.
///
/// `None` leaves the field as is. Identity and ownership are not part of a
/// patch and can never change through one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl RecipePatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image_url.is_none()
    }
}
