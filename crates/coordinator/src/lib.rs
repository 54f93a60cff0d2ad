//! Multi-file upload orchestration.
//!
//! Pulls each file part out of a request, runs it through the ingestion
//! processor, and forwards successful results to metadata persistence. One
//! file failing (source, sink, or persistence) never aborts its siblings —
//! the failure is logged, an event is emitted, and processing continues.

mod coordinator;
mod error;
mod store;
mod types;

pub use coordinator::UploadCoordinator;
pub use error::CoordinatorError;
pub use store::{MetadataError, MetadataStore};
pub use types::{FilePart, UploadEvent};
