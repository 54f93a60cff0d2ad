use futures_util::Stream;
use tokio::sync::mpsc;
use tracing::{error, info};

use streamstore_ingest::{SourceError, UploadProcessor, UploadResult};

use crate::error::CoordinatorError;
use crate::store::MetadataStore;
use crate::types::{FilePart, UploadEvent};

/// Drives every file of a multi-file request through one [`UploadProcessor`].
///
/// Files are processed in request order; a failed file is recorded and
/// skipped, and its siblings continue. The returned sequence contains only
/// the successfully processed (and persisted) results.
pub struct UploadCoordinator {
    processor: UploadProcessor,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
}

impl UploadCoordinator {
    pub fn new(processor: UploadProcessor) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            processor,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Processes all parts of one request, persisting each success through
    /// `store`. Never retries; retry policy belongs to the caller.
    pub async fn process_request<S>(
        &self,
        parts: Vec<FilePart<S>>,
        store: &dyn MetadataStore,
    ) -> Vec<UploadResult>
    where
        S: Stream<Item = Result<Vec<u8>, SourceError>> + Unpin + Send,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        info!(request = %request_id, files = parts.len(), "processing upload request");

        let mut results = Vec::new();
        for part in parts {
            let file_name = part.file_name.clone();
            self.emit(UploadEvent::Started {
                request_id: request_id.clone(),
                file_name: file_name.clone(),
            });

            match self.process_one(part, store).await {
                Ok(result) => {
                    self.emit(UploadEvent::Completed {
                        request_id: request_id.clone(),
                        result: result.clone(),
                    });
                    results.push(result);
                }
                Err(e) => {
                    error!(request = %request_id, file = %file_name, error = %e, "file upload failed");
                    self.emit(UploadEvent::Failed {
                        request_id: request_id.clone(),
                        file_name,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            request = %request_id,
            succeeded = results.len(),
            "upload request finished"
        );
        results
    }

    async fn process_one<S>(
        &self,
        part: FilePart<S>,
        store: &dyn MetadataStore,
    ) -> Result<UploadResult, CoordinatorError>
    where
        S: Stream<Item = Result<Vec<u8>, SourceError>> + Unpin + Send,
    {
        let result = self.processor.process(&part.file_name, part.content).await?;
        store.save(&result).await?;
        info!(file = %result.file_name, "file entry saved");
        Ok(result)
    }

    fn emit(&self, event: UploadEvent) {
        // try_send: observers must never stall the pipeline.
        let _ = self.events_tx.try_send(event);
    }
}
