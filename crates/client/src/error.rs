//! Client error types.

use cookbook_core::remote::RemoteError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not authorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Resource already exists: {resource}")]
    Conflict { resource: String },

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Classifies a non-success status code.
    pub fn from_status(status: u16, resource: impl Into<String>, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status, message },
            404 => Self::NotFound {
                resource: resource.into(),
            },
            409 => Self::Conflict {
                resource: resource.into(),
            },
            _ => Self::ServerError { status, message },
        }
    }

    /// Converts into the Remote Source taxonomy for the given target.
    ///
    /// Transport failures and 5xx responses are `Unavailable`. Anything the
    /// client could not make sense of is `InvalidResponse`.
    pub fn into_remote(self, entity_type: &'static str, id: &str) -> RemoteError {
        match self {
            Self::Request(e) if e.is_decode() => RemoteError::InvalidResponse(e.to_string()),
            Self::Request(e) => RemoteError::Unavailable(e.to_string()),
            Self::Unauthorized { .. } => RemoteError::Unauthorized {
                entity_type,
                id: id.to_string(),
            },
            Self::NotFound { .. } => RemoteError::NotFound {
                entity_type,
                id: id.to_string(),
            },
            Self::Conflict { .. } => RemoteError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            },
            Self::ServerError { status, message } if status >= 500 => {
                RemoteError::Unavailable(format!("server returned {status}: {message}"))
            }
            other => RemoteError::InvalidResponse(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: u16) -> RemoteError {
        ClientError::from_status(status, "Recipe r1", "boom".to_string()).into_remote("Recipe", "r1")
    }

    #[test]
    fn test_auth_statuses_map_to_unauthorized() {
        for status in [401, 403] {
            assert_eq!(
                classify(status),
                RemoteError::Unauthorized {
                    entity_type: "Recipe",
                    id: "r1".to_string()
                }
            );
        }
    }

    #[test]
    fn test_not_found_and_conflict() {
        assert!(matches!(classify(404), RemoteError::NotFound { .. }));
        assert!(matches!(classify(409), RemoteError::AlreadyExists { .. }));
    }

    #[test]
    fn test_server_errors_are_unavailable() {
        assert!(matches!(classify(500), RemoteError::Unavailable(_)));
        assert!(matches!(classify(503), RemoteError::Unavailable(_)));
    }

    #[test]
    fn test_other_statuses_are_invalid_responses() {
        assert!(matches!(classify(400), RemoteError::InvalidResponse(_)));
        assert!(matches!(classify(418), RemoteError::InvalidResponse(_)));
    }

    #[test]
    fn test_not_found_display() {
        let err = ClientError::from_status(404, "User bob", String::new());
        assert_eq!(err.to_string(), "Resource not found: User bob");
    }
}
