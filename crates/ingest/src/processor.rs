//! Per-file ingestion driver.
//!
//! One `process` call owns all per-file state (digest, size counter, batcher
//! or relay) for its whole lifetime — nothing is shared across files, so no
//! atomics are needed anywhere but the relay handoff itself.

use std::io;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::batcher::ChunkBatcher;
use crate::digest::DigestAccumulator;
use crate::error::{SourceError, UploadError};
use crate::relay;
use crate::sink::{SinkHandle, SinkWriter};
use crate::types::UploadResult;
use crate::{DEFAULT_FLUSH_THRESHOLD, DEFAULT_RELAY_CAPACITY};

/// How chunks reach the sink. The two strategies are interchangeable behind
/// [`UploadProcessor::process`]; they differ only in memory/concurrency
/// shape and in their empty-file sink policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStrategy {
    /// Accumulate chunks and write once per threshold crossing.
    ///
    /// The sink is opened lazily on the first flush, so zero-chunk input
    /// performs no sink calls at all.
    Batch { threshold: usize },

    /// Push every chunk into a bounded relay drained by a blocking worker
    /// writing to the sink concurrently with production.
    ///
    /// The sink is opened eagerly — the drain worker must own the handle
    /// before the first chunk arrives — so zero-chunk input sees exactly one
    /// open+close.
    Relay { capacity: usize },
}

impl Default for FlushStrategy {
    fn default() -> Self {
        Self::Batch {
            threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

impl FlushStrategy {
    /// Relay strategy with [`DEFAULT_RELAY_CAPACITY`].
    pub fn relay() -> Self {
        Self::Relay {
            capacity: DEFAULT_RELAY_CAPACITY,
        }
    }
}

/// Ingests one file at a time from an async chunk stream into a sink.
///
/// Blocking sink calls (open/write/close) always run on the blocking thread
/// pool, never on the async reactor. On any failure the open sink handle is
/// released before the error surfaces, and no [`UploadResult`] is produced.
/// Bytes from batches already written before a failure stay at the sink —
/// there is no rollback across writes.
pub struct UploadProcessor {
    sink: Arc<dyn SinkWriter>,
    strategy: FlushStrategy,
    cancel: CancellationToken,
}

impl UploadProcessor {
    pub fn new(sink: Arc<dyn SinkWriter>, strategy: FlushStrategy) -> Self {
        Self::with_cancel(sink, strategy, CancellationToken::new())
    }

    /// Like [`new`](Self::new), with an externally owned cancellation token.
    /// Cancelling it stops chunk consumption at the next chunk boundary,
    /// releases the sink handle, and fails the upload.
    pub fn with_cancel(
        sink: Arc<dyn SinkWriter>,
        strategy: FlushStrategy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sink,
            strategy,
            cancel,
        }
    }

    /// Returns the token that cancels uploads driven by this processor.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drives one file's chunks to the sink and produces its metadata.
    pub async fn process<S>(&self, file_name: &str, chunks: S) -> Result<UploadResult, UploadError>
    where
        S: Stream<Item = Result<Vec<u8>, SourceError>> + Unpin + Send,
    {
        let result = match self.strategy {
            FlushStrategy::Batch { threshold } => {
                self.process_batched(file_name, chunks, threshold).await
            }
            FlushStrategy::Relay { capacity } => {
                self.process_relayed(file_name, chunks, capacity).await
            }
        };

        match &result {
            Ok(r) => info!(file = %r.file_name, size_bytes = r.size_bytes, "upload complete"),
            Err(e) => error!(file = %file_name, error = %e, "upload failed"),
        }
        result
    }

    async fn process_batched<S>(
        &self,
        file_name: &str,
        mut chunks: S,
        threshold: usize,
    ) -> Result<UploadResult, UploadError>
    where
        S: Stream<Item = Result<Vec<u8>, SourceError>> + Unpin + Send,
    {
        let mut digest = DigestAccumulator::new();
        let mut batcher = ChunkBatcher::new(threshold);
        let mut size_bytes: u64 = 0;
        let mut handle: Option<Box<dyn SinkHandle>> = None;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    close_quietly(handle.take()).await;
                    return Err(UploadError::Cancelled);
                }
                next = chunks.next() => next,
            };

            let chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    close_quietly(handle.take()).await;
                    return Err(e.into());
                }
                None => break,
            };

            size_bytes += chunk.len() as u64;
            if let Some(batch) = batcher.offer(chunk) {
                digest.update(&batch);
                handle = Some(self.write_batch(file_name, handle.take(), batch).await?);
            }
        }

        // Trailing partial batch — dropping it would truncate the file.
        if let Some(batch) = batcher.finish() {
            digest.update(&batch);
            handle = Some(self.write_batch(file_name, handle.take(), batch).await?);
        }

        if let Some(handle) = handle {
            tokio::task::spawn_blocking(move || handle.close()).await??;
        }

        Ok(UploadResult {
            file_name: file_name.to_string(),
            digest_base64: digest.finalize(),
            size_bytes,
        })
    }

    /// Writes one batch on the blocking pool, opening the sink on first use.
    /// On a write failure the handle is closed before the error is returned.
    async fn write_batch(
        &self,
        file_name: &str,
        handle: Option<Box<dyn SinkHandle>>,
        batch: Vec<u8>,
    ) -> Result<Box<dyn SinkHandle>, UploadError> {
        let sink = Arc::clone(&self.sink);
        let file_name = file_name.to_string();
        let handle = tokio::task::spawn_blocking(move || -> io::Result<Box<dyn SinkHandle>> {
            let mut handle = match handle {
                Some(h) => h,
                None => sink.open(&file_name)?,
            };
            if let Err(e) = handle.write_all(&batch) {
                let _ = handle.close();
                return Err(e);
            }
            Ok(handle)
        })
        .await??;
        Ok(handle)
    }

    async fn process_relayed<S>(
        &self,
        file_name: &str,
        mut chunks: S,
        capacity: usize,
    ) -> Result<UploadResult, UploadError>
    where
        S: Stream<Item = Result<Vec<u8>, SourceError>> + Unpin + Send,
    {
        // The drain worker owns the handle for the whole stream, so the sink
        // is opened before the first chunk arrives.
        let sink = Arc::clone(&self.sink);
        let name = file_name.to_string();
        let handle = tokio::task::spawn_blocking(move || sink.open(&name)).await??;

        let (tx, mut rx) = relay::bounded(capacity);
        let drain = tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut handle = handle;
            while let Some(bytes) = rx.blocking_recv() {
                if let Err(e) = handle.write_all(&bytes) {
                    let _ = handle.close();
                    return Err(e);
                }
            }
            handle.close()
        });

        let mut digest = DigestAccumulator::new();
        let mut size_bytes: u64 = 0;
        let mut failure: Option<UploadError> = None;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    failure = Some(UploadError::Cancelled);
                    break;
                }
                next = chunks.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    digest.update(&chunk);
                    size_bytes += chunk.len() as u64;
                    if tx.send(chunk).await.is_err() {
                        // Drain worker died; its sink error surfaces below.
                        break;
                    }
                }
                Some(Err(e)) => {
                    failure = Some(e.into());
                    break;
                }
                None => break,
            }
        }

        // Closing the producer end is what lets the drain worker observe
        // end-of-stream, finish writing, and close the sink. Skipping this
        // on any path would leak the worker.
        drop(tx);
        let drained = drain.await?;

        if let Some(e) = failure {
            if let Err(sink_err) = drained {
                warn!(file = %file_name, error = %sink_err, "sink also failed during abort");
            }
            return Err(e);
        }
        drained?;

        Ok(UploadResult {
            file_name: file_name.to_string(),
            digest_base64: digest.finalize(),
            size_bytes,
        })
    }
}

/// Best-effort close on an abort path; failures are logged, not surfaced.
async fn close_quietly(handle: Option<Box<dyn SinkHandle>>) {
    let Some(handle) = handle else {
        return;
    };
    match tokio::task::spawn_blocking(move || handle.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "sink close failed during abort"),
        Err(e) => warn!(error = %e, "sink close task failed during abort"),
    }
}
