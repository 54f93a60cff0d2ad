use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

/// Incremental SHA-256 over the bytes headed for the sink.
///
/// `update` is order-sensitive and must see every byte sequence exactly once,
/// in write order. [`finalize`](Self::finalize) consumes the accumulator, so
/// updating after finalization cannot compile — the finalize-once invariant
/// is enforced by ownership.
pub struct DigestAccumulator {
    hasher: Sha256,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Appends `bytes` to the running hash.
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Returns the digest as a base64 token (44 chars for SHA-256).
    pub fn finalize(self) -> String {
        STANDARD.encode(self.hasher.finalize())
    }
}

impl Default for DigestAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
