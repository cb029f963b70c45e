use thiserror::Error;

/// Errors reported by a Remote Source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// No connectivity, timeout, or the server is failing.
    #[error("Remote unavailable: {0}")]
    Unavailable(String),
    /// The acting identity may not modify the target.
    #[error("Not authorized to modify {entity_type} {id}")]
    Unauthorized {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Returns true for failures worth a user-initiated retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type for Remote Source operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
