//! Error types for the ingestion pipeline.

/// Failure reported by the chunk source itself (the upstream request).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SourceError(String);

impl SourceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors that terminate one file's ingestion.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("chunk source failed: {0}")]
    Source(#[from] SourceError),

    #[error("sink I/O failed: {0}")]
    Sink(#[from] std::io::Error),

    #[error("sink worker terminated: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("upload cancelled")]
    Cancelled,
}
