//! Error taxonomy for the harness
//!
//! Only `CorpusUnavailable` and `UnknownCategory` ever stop a run, and both are raised before
//! the first file is touched. `ExternalInvocation` and `Cleanup` are produced inside the run
//! and are logged, never propagated to the operator as a harness failure.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the harness library.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("corpus directory '{}' is unavailable: {source}", path.display())]
    CorpusUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown category '{name}' (known categories: {})", known.join(", "))]
    UnknownCategory { name: String, known: Vec<String> },

    #[error("failed to invoke '{program}': {reason}")]
    ExternalInvocation { program: String, reason: String },

    #[error("failed to remove artifact '{}': {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
