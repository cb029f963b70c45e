//! JSON file cursor store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cookbook_core::sync::{CursorError, CursorStore};

/// On-disk shape of the cursor file.
#[derive(Debug, Serialize, Deserialize)]
struct CursorFile {
    last_synced_millis: i64,
}

/// Keeps the sync cursor in a small JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous cursor intact.
#[derive(Debug, Clone)]
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn load(&self) -> Result<Option<i64>, CursorError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No cursor file yet");
                return Ok(None);
            }
            Err(e) => return Err(CursorError::Io(e.to_string())),
        };

        let file: CursorFile = serde_json::from_slice(&contents)
            .map_err(|e| CursorError::Serialization(e.to_string()))?;
        Ok(Some(file.last_synced_millis))
    }

    async fn save(&self, millis: i64) -> Result<(), CursorError> {
        let contents = serde_json::to_vec(&CursorFile {
            last_synced_millis: millis,
        })
        .map_err(|e| CursorError::Serialization(e.to_string()))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, contents)
            .await
            .map_err(|e| CursorError::Io(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| CursorError::Io(e.to_string()))?;

        tracing::trace!(path = %self.path.display(), millis, "Saved sync cursor");
        Ok(())
    }
}
