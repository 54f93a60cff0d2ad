use crate::store::MetadataError;
use streamstore_ingest::UploadError;

/// Failure of one file within a request.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
