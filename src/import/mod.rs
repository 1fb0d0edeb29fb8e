//! Bulk import pipeline.
//!
//! Pushes an ordered document sequence into the remote store through its
//! server-side batch-insert procedure. The flow is: resolve the target
//! collection and procedure (idempotently, safe to race with other workers),
//! back-fill missing document ids, then submit size- and count-bounded chunks
//! under a fresh backoff retry policy per call, advancing only by the number
//! of documents the server reports committed.
//!
//! The run is not transactional across chunks: a failed run leaves earlier
//! chunks committed, and errors carry the failing chunk's offset so an
//! operator can retry idempotently (imports default to upsert).

pub mod chunk;
pub mod document;
pub mod error;
pub mod importer;
pub mod retry;

pub use document::Document;
pub use error::ImportError;
pub use importer::{BulkImporter, ImportStats};
pub use retry::BackoffRetryPolicy;
