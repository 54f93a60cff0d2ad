use crate::DEFAULT_FLUSH_THRESHOLD;

/// Accumulates chunks for one file until a byte threshold is crossed.
///
/// The threshold check is `>=` after appending, so a single chunk at or above
/// the threshold flushes immediately, and a large chunk landing on a
/// partially filled buffer emits one batch *larger* than the threshold.
/// Overshoot is intended; batches are never split to cap their size.
pub struct ChunkBatcher {
    threshold: usize,
    held: Vec<Vec<u8>>,
    accumulated: usize,
}

impl ChunkBatcher {
    /// Creates a batcher with the given flush threshold in bytes.
    ///
    /// If `threshold` is 0, [`DEFAULT_FLUSH_THRESHOLD`] (8 KiB) is used.
    pub fn new(threshold: usize) -> Self {
        let threshold = if threshold == 0 {
            DEFAULT_FLUSH_THRESHOLD
        } else {
            threshold
        };
        Self {
            threshold,
            held: Vec::new(),
            accumulated: 0,
        }
    }

    /// Offers one chunk. Returns the concatenated batch when the accumulated
    /// size reaches the threshold, `None` while the chunk is merely held.
    pub fn offer(&mut self, chunk: Vec<u8>) -> Option<Vec<u8>> {
        self.accumulated += chunk.len();
        self.held.push(chunk);
        if self.accumulated >= self.threshold {
            Some(self.take_batch())
        } else {
            None
        }
    }

    /// Flushes whatever is held as a final partial batch.
    ///
    /// Must be called at stream end — skipping it drops the file's tail.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.held.is_empty() {
            None
        } else {
            Some(self.take_batch())
        }
    }

    fn take_batch(&mut self) -> Vec<u8> {
        let mut batch = Vec::with_capacity(self.accumulated);
        for chunk in self.held.drain(..) {
            batch.extend_from_slice(&chunk);
        }
        self.accumulated = 0;
        batch
    }
}
