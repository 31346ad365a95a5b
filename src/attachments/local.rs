use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::{AttachmentError, AttachmentStore};

/// Filesystem attachment store writing into a single destination directory.
pub struct LocalAttachments {
    base_path: PathBuf,
}

impl LocalAttachments {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn attachment_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

/// Build the stored name for an upload: a fresh UUID prefix keeps two uploads
/// of the same file from ever colliding, and only the basename of whatever
/// the client sent survives.
fn stored_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or("attachment");
    format!("{}-{}", uuid::Uuid::new_v4(), base)
}

/// Stored names never contain path separators, so anything that does is a
/// lookup for something we did not store.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[async_trait]
impl AttachmentStore for LocalAttachments {
    async fn save(&self, original_name: &str, data: Bytes) -> Result<String, AttachmentError> {
        let name = stored_name(original_name);
        let path = self.attachment_path(&name);
        tokio::fs::write(&path, &data).await?;
        Ok(name)
    }

    async fn read(&self, stored_name: &str) -> Result<Bytes, AttachmentError> {
        if !is_safe_name(stored_name) {
            return Err(AttachmentError::InvalidName(stored_name.to_string()));
        }
        let path = self.attachment_path(stored_name);
        if !path.exists() {
            return Err(AttachmentError::NotFound(stored_name.to_string()));
        }
        let data = tokio::fs::read(&path).await?;
        Ok(Bytes::from(data))
    }

    async fn exists(&self, stored_name: &str) -> Result<bool, AttachmentError> {
        if !is_safe_name(stored_name) {
            return Err(AttachmentError::InvalidName(stored_name.to_string()));
        }
        let path = self.attachment_path(stored_name);
        Ok(path.exists())
    }
}
