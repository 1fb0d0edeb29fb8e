use crate::store::StoreError;
use thiserror::Error;

/// Errors that terminate an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A non-retryable store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A retryable failure persisted past the attempt/time budget.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },
    /// The retry config allows zero attempts, so the operation never ran.
    #[error("retry policy permitted no attempts")]
    NoAttemptsPermitted,
    /// Submission failed at a known cursor position.
    #[error("import failed at offset {offset}: {source}")]
    Chunk {
        offset: usize,
        #[source]
        source: Box<ImportError>,
    },
    /// The batch-insert procedure answered with something other than a count.
    #[error("unparseable committed count {body:?} for chunk at offset {offset}")]
    BadCommittedCount { offset: usize, body: String },
    /// A nominally successful call that commits nothing would loop forever.
    #[error("no progress: procedure committed 0 of {submitted} documents at offset {offset}")]
    NoProgress { offset: usize, submitted: usize },
    /// A committed count above the submitted chunk size would skip input.
    #[error("committed count {committed} exceeds submitted chunk of {submitted} at offset {offset}")]
    CommittedOverrun {
        offset: usize,
        committed: usize,
        submitted: usize,
    },
}
