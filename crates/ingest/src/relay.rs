//! Bounded handoff between the async chunk producer and a blocking drain
//! worker.
//!
//! The producer end suspends once `capacity` chunks are queued, so a fast
//! source cannot exhaust memory. Dropping the producer end signals
//! end-of-stream to the drain side; dropping the drain side (after a sink
//! failure) makes the next `send` fail, which is how the consumer's error
//! reaches the producer.

use tokio::sync::mpsc;

use crate::DEFAULT_RELAY_CAPACITY;

/// Error returned by [`RelaySender::send`] when the drain side is gone.
#[derive(Debug, thiserror::Error)]
#[error("relay closed: drain worker is gone")]
pub struct RelayClosed;

/// Producer end of the relay.
pub struct RelaySender {
    tx: mpsc::Sender<Vec<u8>>,
}

/// Consumer end of the relay, meant for a blocking worker thread.
pub struct RelayReceiver {
    rx: mpsc::Receiver<Vec<u8>>,
}

/// Creates a relay holding at most `capacity` queued chunks.
///
/// If `capacity` is 0, [`DEFAULT_RELAY_CAPACITY`] is used.
pub fn bounded(capacity: usize) -> (RelaySender, RelayReceiver) {
    let capacity = if capacity == 0 {
        DEFAULT_RELAY_CAPACITY
    } else {
        capacity
    };
    let (tx, rx) = mpsc::channel(capacity);
    (RelaySender { tx }, RelayReceiver { rx })
}

impl RelaySender {
    /// Queues one chunk, suspending while the relay is full.
    pub async fn send(&self, bytes: Vec<u8>) -> Result<(), RelayClosed> {
        self.tx.send(bytes).await.map_err(|_| RelayClosed)
    }
}

impl RelayReceiver {
    /// Blocks until a chunk is available; `None` means the producer end was
    /// dropped and everything queued has been delivered.
    ///
    /// Must only be called off the async runtime (e.g. inside
    /// `spawn_blocking`) — `tokio` panics otherwise.
    pub fn blocking_recv(&mut self) -> Option<Vec<u8>> {
        self.rx.blocking_recv()
    }

    /// Async receive, used by tests and non-blocking consumers.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }
}
