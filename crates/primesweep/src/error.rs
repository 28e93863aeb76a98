//! Error types for configuration and search execution.
//!
//! ## Error Cases
//! - [`ConfigError`]: the key-value source could not be read, a key is
//!   missing, or a value is not a positive integer. Always raised before any
//!   worker is spawned.
//! - [`SearchError`]: everything that can go wrong once a search has been
//!   accepted, most importantly a worker fault, which aborts the whole run
//!   instead of producing a partial report.

use std::num::ParseIntError;
use std::path::PathBuf;

/// A result type defaulting to [`SearchError`].
pub type Result<T, E = SearchError> = core::result::Result<T, E>;

/// Invalid or unreadable search configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration source could not be opened or read.
    #[error("could not open config file '{}'", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required key never appeared in the source.
    #[error("missing required key `{key}`")]
    MissingKey { key: &'static str },

    /// A value was present but is not an integer.
    #[error("value `{value}` for `{key}` is not a valid integer")]
    InvalidInteger {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A value parsed but is zero or negative.
    #[error("`{key}` must be greater than 0 (got {value})")]
    NotPositive { key: &'static str, value: i64 },

    /// A search was requested with no workers.
    #[error("worker count must be greater than 0")]
    ZeroWorkers,
}

/// Failure of an accepted search.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The configuration was rejected before partitioning.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A worker failed while scanning its partition.
    #[error("worker {worker_id} failed: {reason}")]
    WorkerFault {
        worker_id: usize,
        #[source]
        reason: Box<SearchError>,
    },

    /// A worker panicked; its partition was not fully covered.
    #[error("worker {worker_id} panicked")]
    WorkerPanicked { worker_id: usize },

    /// The sink's output could not be written.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// A batch sink received a second result for the same worker.
    #[error("worker {worker_id} handed off its results twice")]
    DuplicateHandOff { worker_id: usize },

    /// A batch sink was asked to stream a single match.
    #[error("batch sink does not accept streamed matches")]
    UnexpectedRecord,

    /// The worker stopped because another worker faulted.
    #[error("search aborted after a fault in another worker")]
    Aborted,

    /// The async runtime backing the worker pool could not be built.
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl SearchError {
    /// Wraps `self` as a fault of `worker_id`, unless it already names one.
    pub(crate) fn in_worker(self, worker_id: usize) -> Self {
        match self {
            Self::WorkerFault { .. } | Self::WorkerPanicked { .. } | Self::Aborted => self,
            other => Self::WorkerFault {
                worker_id,
                reason: Box::new(other),
            },
        }
    }
}
