use streamstore_ingest::UploadResult;

/// One file part extracted from a multi-file request: a name plus its
/// async chunk stream.
pub struct FilePart<S> {
    pub file_name: String,
    pub content: S,
}

impl<S> FilePart<S> {
    pub fn new(file_name: impl Into<String>, content: S) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }
}

/// Progress events emitted while a request is processed.
///
/// Delivery is best-effort: events are dropped rather than ever stalling the
/// pipeline on a slow observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Started {
        request_id: String,
        file_name: String,
    },
    Completed {
        request_id: String,
        result: UploadResult,
    },
    Failed {
        request_id: String,
        file_name: String,
        error: String,
    },
}
