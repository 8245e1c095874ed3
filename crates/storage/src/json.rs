//! Flat-file backend: one pretty-printed JSON document per `DocumentKind`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use tracker_core::model::{Goals, ProgressState, SessionRecord};

use crate::repository::{
    DocumentKind, GoalsRepository, ProgressRepository, SessionHistoryRepository, Storage,
    StorageError,
};

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Stores each document as a whole file inside `dir`, rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn document_path(&self, kind: DocumentKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn tmp_path(&self, kind: DocumentKind) -> PathBuf {
        self.dir.join(format!("{}{TMP_SUFFIX}", kind.file_name()))
    }

    /// Read and parse a document.
    ///
    /// A missing file is `Ok(None)`. A file that does not parse is logged and also
    /// treated as `Ok(None)`, so the caller falls back to defaults and the next save
    /// replaces it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` for read failures other than a missing file.
    pub async fn read_document<T: DeserializeOwned>(
        &self,
        kind: DocumentKind,
    ) -> Result<Option<T>, StorageError> {
        let path = self.document_path(kind);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        match serde_json::from_str(&contents) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                warn!(
                    document = %kind,
                    path = %path.display(),
                    error = %e,
                    "corrupted document, using defaults"
                );
                Ok(None)
            }
        }
    }

    /// Serialize a document, write it beside the target, then rename it into place.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` or `StorageError::Io`.
    pub async fn write_document<T: Serialize + ?Sized>(
        &self,
        kind: DocumentKind,
        document: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let tmp_path = self.tmp_path(kind);
        let io_err = |source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        };
        let mut tmp_file = fs::File::create(&tmp_path).await.map_err(io_err)?;
        tmp_file.write_all(json.as_bytes()).await.map_err(io_err)?;
        tmp_file.sync_all().await.map_err(io_err)?;
        drop(tmp_file);

        let path = self.document_path(kind);
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| StorageError::Io { path, source })?;

        debug!(document = %kind, bytes = json.len(), "document saved");
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for JsonFileRepository {
    async fn load_progress(&self) -> Result<Option<ProgressState>, StorageError> {
        self.read_document(DocumentKind::Progress).await
    }

    async fn save_progress(&self, progress: &ProgressState) -> Result<(), StorageError> {
        self.write_document(DocumentKind::Progress, progress).await
    }
}

#[async_trait]
impl SessionHistoryRepository for JsonFileRepository {
    async fn load_sessions(&self) -> Result<Option<Vec<SessionRecord>>, StorageError> {
        self.read_document(DocumentKind::Sessions).await
    }

    async fn save_sessions(&self, sessions: &[SessionRecord]) -> Result<(), StorageError> {
        self.write_document(DocumentKind::Sessions, sessions).await
    }
}

#[async_trait]
impl GoalsRepository for JsonFileRepository {
    async fn load_goals(&self) -> Result<Option<Goals>, StorageError> {
        self.read_document(DocumentKind::Goals).await
    }

    async fn save_goals(&self, goals: &Goals) -> Result<(), StorageError> {
        self.write_document(DocumentKind::Goals, goals).await
    }
}

impl Storage {
    /// Storage backed by JSON files in `dir`. The directory is created on first save.
    #[must_use]
    pub fn json_dir(dir: impl AsRef<Path>) -> Self {
        Self::from_backend(JsonFileRepository::new(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_repo() -> (JsonFileRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = JsonFileRepository::new(temp_dir.path().join("data"));
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn missing_directory_loads_as_none() {
        let (repo, _temp_dir) = test_repo();
        assert!(repo.load_goals().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_leaves_no_tmp_file() {
        let (repo, _temp_dir) = test_repo();
        repo.save_goals(&Goals::default()).await.unwrap();

        assert!(repo.document_path(DocumentKind::Goals).exists());
        assert!(!repo.tmp_path(DocumentKind::Goals).exists());
    }

    #[tokio::test]
    async fn corrupt_document_loads_as_none() {
        let (repo, _temp_dir) = test_repo();
        std::fs::create_dir_all(repo.dir()).unwrap();
        std::fs::write(repo.document_path(DocumentKind::Progress), "{ not json").unwrap();

        assert!(repo.load_progress().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_failure_other_than_missing_is_an_error() {
        let (repo, _temp_dir) = test_repo();
        std::fs::create_dir_all(repo.document_path(DocumentKind::Sessions)).unwrap();

        let err = repo.load_sessions().await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
