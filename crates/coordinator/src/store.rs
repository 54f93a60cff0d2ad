use std::future::Future;
use std::pin::Pin;

use streamstore_ingest::UploadResult;

/// Error from the metadata persistence collaborator.
#[derive(Debug, thiserror::Error)]
#[error("metadata store failed: {0}")]
pub struct MetadataError(String);

impl MetadataError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Persistence collaborator for upload metadata.
///
/// External concern (database, catalog service); the coordinator only needs
/// `save` to succeed before it counts a file as processed.
pub trait MetadataStore: Send + Sync {
    fn save(
        &self,
        result: &UploadResult,
    ) -> Pin<Box<dyn Future<Output = Result<(), MetadataError>> + Send + '_>>;
}
