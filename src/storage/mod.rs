//! External image-store collaborator.
//!
//! The service layer only sees the [`ImageStore`] trait: save bytes under a
//! filename, get back a stable reference URL, delete by that reference. The
//! shipped implementation writes to a local media directory served under
//! `/media`; a real object-store backend would slot in behind the same trait.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("invalid stored reference: {0}")]
    InvalidReference(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image file as received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the bytes and return a stable reference URL.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Delete a previously stored file by its reference URL.
    async fn delete(&self, reference: &str) -> Result<(), StorageError>;
}

/// Lowercased extension of a filename, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether the filename carries one of the allowed image extensions.
pub fn is_allowed_image(filename: &str, allowed: &HashSet<String>) -> bool {
    file_extension(filename).is_some_and(|ext| allowed.contains(&ext))
}

/// Stores images as uuid-named files under a local directory.
pub struct DiskImageStore {
    root: PathBuf,
    public_base: String,
}

impl DiskImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a reference URL back to a path inside the media directory.
    /// Only plain file names under the public base are accepted.
    fn path_for_reference(&self, reference: &str) -> Result<PathBuf, StorageError> {
        let name = reference
            .strip_prefix(&self.public_base)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::InvalidReference(reference.to_string()))?;
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(StorageError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let ext = file_extension(filename)
            .ok_or_else(|| StorageError::UnsupportedType(filename.to_string()))?;

        tokio::fs::create_dir_all(&self.root).await?;

        let stored_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(self.root.join(&stored_name), bytes).await?;

        Ok(format!("{}/{stored_name}", self.public_base))
    }

    async fn delete(&self, reference: &str) -> Result<(), StorageError> {
        let path = self.path_for_reference(reference)?;
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> DiskImageStore {
        let dir = std::env::temp_dir().join(format!("catalog-api-store-{}", Uuid::new_v4()));
        DiskImageStore::new(dir, "/media")
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Photo.JPG"), Some("jpg".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("noext"), None);
    }

    #[test]
    fn allow_list_is_enforced() {
        let allowed: HashSet<String> =
            ["png", "jpg", "jpeg", "webp"].iter().map(|s| s.to_string()).collect();
        assert!(is_allowed_image("tile.webp", &allowed));
        assert!(is_allowed_image("TILE.PNG", &allowed));
        assert!(!is_allowed_image("notes.txt", &allowed));
        assert!(!is_allowed_image("noext", &allowed));
    }

    #[tokio::test]
    async fn saves_and_deletes_roundtrip() {
        let store = temp_store();
        let reference = store.save("tile.png", b"fake-png").await.unwrap();
        assert!(reference.starts_with("/media/"));
        assert!(reference.ends_with(".png"));

        let path = store.path_for_reference(&reference).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"fake-png");

        store.delete(&reference).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn rejects_foreign_and_traversal_references() {
        let store = temp_store();
        for reference in [
            "https://elsewhere.example/media/a.png",
            "/media/../etc/passwd",
            "/media/sub/dir.png",
            "/media/",
        ] {
            assert!(
                matches!(store.delete(reference).await, Err(StorageError::InvalidReference(_))),
                "accepted {reference}"
            );
        }
    }

    #[tokio::test]
    async fn save_requires_an_extension() {
        let store = temp_store();
        assert!(matches!(
            store.save("noext", b"x").await,
            Err(StorageError::UnsupportedType(_))
        ));
    }
}
