mod local;

pub use local::LocalAttachments;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid attachment name: {0}")]
    InvalidName(String),
    #[error("Attachment not found: {0}")]
    NotFound(String),
}

/// Abstraction over attachment storage.
/// Stored names are returned by `save` and recorded on the owning record;
/// the blobs are unreachable without them.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Persist one uploaded attachment, returning its unique stored name.
    async fn save(&self, original_name: &str, data: Bytes) -> Result<String, AttachmentError>;
    async fn read(&self, stored_name: &str) -> Result<Bytes, AttachmentError>;
    async fn exists(&self, stored_name: &str) -> Result<bool, AttachmentError>;
}
