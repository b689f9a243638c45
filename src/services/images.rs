// Employee photo storage: inline data URLs or files on disk
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{ImageConfig, ImageStorage};

/// URL prefix the disk store is served under
pub const STORAGE_ROUTE: &str = "/storage";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image reference: {0}")]
    InvalidReference(String),
}

/// Image formats accepted for employee photos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Detect the format from the leading magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageKind::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageKind::Gif)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
        }
    }
}

/// A validated upload ready to be persisted
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the upload and return the reference kept in the employee row
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageError>;

    /// Remove whatever `reference` points at. Missing artefacts are not an error.
    async fn discard(&self, reference: &str) -> Result<(), ImageError>;

    /// Value clients see in the `image` field
    fn public_url(&self, reference: &str) -> String;
}

/// Build the store selected by configuration
pub fn from_config(config: &ImageConfig) -> Arc<dyn ImageStore> {
    match config.storage {
        ImageStorage::Inline => Arc::new(InlineImageStore),
        ImageStorage::Disk => Arc::new(DiskImageStore::new(config.directory.clone())),
    }
}

/// Keeps the image in the row as a `data:` URL
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineImageStore;

#[async_trait]
impl ImageStore for InlineImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageError> {
        Ok(format!(
            "data:{};base64,{}",
            upload.kind.mime(),
            STANDARD.encode(&upload.bytes)
        ))
    }

    async fn discard(&self, _reference: &str) -> Result<(), ImageError> {
        Ok(())
    }

    fn public_url(&self, reference: &str) -> String {
        reference.to_string()
    }
}

/// Writes `employees/<uuid>.<ext>` under `root`; the row keeps the relative path
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    root: PathBuf,
}

impl DiskImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, ImageError> {
        let relative = Path::new(reference);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(ImageError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageError> {
        let reference = format!("employees/{}.{}", Uuid::new_v4(), upload.kind.extension());
        let path = self.resolve(&reference)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::debug!("Stored image at {}", path.display());
        Ok(reference)
    }

    async fn discard(&self, reference: &str) -> Result<(), ImageError> {
        // Rows written by the inline store can survive a switch to disk storage
        if reference.starts_with("data:") {
            return Ok(());
        }

        let path = self.resolve(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, reference: &str) -> String {
        if reference.starts_with("data:") {
            return reference.to_string();
        }
        format!("{}/{}", STORAGE_ROUTE, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[test]
    fn sniffs_supported_formats() {
        assert_eq!(ImageKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::sniff(PNG), Some(ImageKind::Png));
        assert_eq!(ImageKind::sniff(b"GIF89a...."), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(b"%PDF-1.7"), None);
        assert_eq!(ImageKind::sniff(b""), None);
    }

    #[tokio::test]
    async fn inline_store_produces_data_url() {
        let store = InlineImageStore;
        let reference = store
            .store(ImageUpload { kind: ImageKind::Png, bytes: PNG.to_vec() })
            .await
            .unwrap();
        assert!(reference.starts_with("data:image/png;base64,"));
        assert_eq!(store.public_url(&reference), reference);
        store.discard(&reference).await.unwrap();
    }

    #[tokio::test]
    async fn disk_store_writes_and_discards() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(dir.path());

        let reference = store
            .store(ImageUpload { kind: ImageKind::Png, bytes: PNG.to_vec() })
            .await
            .unwrap();
        assert!(reference.starts_with("employees/"));
        assert!(reference.ends_with(".png"));
        assert_eq!(store.public_url(&reference), format!("/storage/{}", reference));

        let path = dir.path().join(&reference);
        assert_eq!(std::fs::read(&path).unwrap(), PNG);

        store.discard(&reference).await.unwrap();
        assert!(!path.exists());
        // already gone
        store.discard(&reference).await.unwrap();
    }

    #[tokio::test]
    async fn disk_store_rejects_escaping_references() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(dir.path());
        assert!(matches!(
            store.discard("../secrets.txt").await,
            Err(ImageError::InvalidReference(_))
        ));
        assert!(store.discard("data:image/png;base64,AAAA").await.is_ok());
    }
}
