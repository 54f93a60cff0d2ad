//! Streaming upload ingestion pipeline.
//!
//! Consumes an ordered, asynchronously delivered sequence of byte chunks for
//! one file, persists the bytes to a [`SinkWriter`] in arrival order, and
//! computes a SHA-256 digest over exactly the bytes written — without ever
//! holding the whole file in memory.
//!
//! Two interchangeable flush strategies sit behind [`UploadProcessor`]:
//!
//! 1. **Batch** — chunks accumulate until a byte threshold is crossed, then
//!    flush as one blocking write (see [`ChunkBatcher`]).
//! 2. **Relay** — every chunk is pushed into a bounded in-process channel
//!    drained by a dedicated blocking worker that writes to the sink
//!    concurrently with production (see [`relay`]).

mod batcher;
mod digest;
mod error;
mod processor;
pub mod relay;
mod sink;
mod types;

pub use batcher::ChunkBatcher;
pub use digest::DigestAccumulator;
pub use error::{SourceError, UploadError};
pub use processor::{FlushStrategy, UploadProcessor};
pub use sink::{SinkHandle, SinkWriter};
pub use types::UploadResult;

/// Default flush threshold for the batch strategy: 8 KiB.
///
/// Chunks are held until at least this many bytes have accumulated, then
/// written to the sink as a single batch.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 8192;

/// Default relay capacity: chunks queued ahead of the drain worker.
///
/// The relay is bounded, so a fast producer suspends once this many chunks
/// are waiting — backpressure, not unbounded memory growth.
pub const DEFAULT_RELAY_CAPACITY: usize = 32;
