use serde::{Deserialize, Serialize};

/// Metadata produced once a file has been fully ingested.
///
/// `size_bytes` equals the sum of all chunk lengths fed to the digest, and
/// `digest_base64` is the SHA-256 of exactly the bytes written to the sink,
/// in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_name: String,
    pub digest_base64: String,
    pub size_bytes: u64,
}
