//! Image Asset Store
//!
//! Collaborator for removing stored event images during event
//! deletion and image replacement. Upload wiring itself lives at the
//! edge and is not modelled here.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, Result};

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Remove the asset behind a stored reference. Removing an
    /// already-absent asset is a success.
    async fn remove(&self, reference: &str) -> Result<()>;
}

/// Filesystem-backed store; references are paths relative to the
/// upload root (e.g. "/uploads/abc.png").
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn remove(&self, reference: &str) -> Result<()> {
        // References come from our own records, but never follow
        // parent-directory components out of the upload root.
        if reference.contains("..") {
            return Err(AppError::validation("Invalid image reference"));
        }

        let path = self.root.join(reference.trim_start_matches('/'));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!(
                "Failed to remove image {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Store that keeps nothing; used by tests and the memory backend.
pub struct NoopImageStore;

#[async_trait]
impl ImageStore for NoopImageStore {
    async fn remove(&self, _reference: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.png");
        std::fs::write(&path, b"img").unwrap();

        let store = FsImageStore::new(dir.path());
        store.remove("/pic.png").await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path());
        assert!(store.remove("/nope.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_parent_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path());
        assert!(store.remove("../etc/passwd").await.is_err());
    }
}
