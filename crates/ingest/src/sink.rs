//! Sink traits: the durable destination for a file's byte stream.
//!
//! Writes are assumed to block, so the processor only ever calls these from
//! `spawn_blocking` threads. Both traits are object-safe; the processor holds
//! the writer as `Arc<dyn SinkWriter>`.

use std::io;

/// An open destination for one file's bytes.
pub trait SinkHandle: Send {
    /// Writes all of `bytes`. May block.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flushes and releases the destination.
    fn close(self: Box<Self>) -> io::Result<()>;
}

impl std::fmt::Debug for dyn SinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SinkHandle")
    }
}

/// Opens sink destinations by file name.
///
/// May be invoked zero times for a file: the batch strategy never opens the
/// sink for empty input.
pub trait SinkWriter: Send + Sync {
    fn open(&self, file_name: &str) -> io::Result<Box<dyn SinkHandle>>;
}
