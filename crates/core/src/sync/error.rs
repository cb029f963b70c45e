use thiserror::Error;

use crate::recipe::RecipeError;
use crate::remote::RemoteError;
use crate::storage::RepositoryError;

use super::CursorError;

/// Errors surfaced by the sync coordinator.
///
/// Remote failures are flattened into the variants callers act on; local
/// failures keep their layer error as the source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),
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
    Conflict {
        entity_type: &'static str,
        id: String,
    },
    #[error("Local store failure: {0}")]
    LocalStoreIo(#[from] RepositoryError),
    #[error("Sync cursor failure: {0}")]
    Cursor(#[from] CursorError),
    #[error("Invalid recipe: {0}")]
    InvalidRecord(#[from] RecipeError),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unavailable(reason) => Self::RemoteUnavailable(reason),
            RemoteError::Unauthorized { entity_type, id } => {
                Self::Unauthorized { entity_type, id }
            }
            RemoteError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            RemoteError::AlreadyExists { entity_type, id } => Self::Conflict { entity_type, id },
            RemoteError::InvalidResponse(reason) => {
                Self::RemoteUnavailable(format!("invalid response: {reason}"))
            }
        }
    }
}

/// Result type for coordinator operations.
pub type Result<T> = std::result::Result<T, SyncError>;
