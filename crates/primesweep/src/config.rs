use crate::ConfigError;

/// Shape of a search: how many workers scan the range `[1, upper_bound]`.
///
/// Created once from external input and never mutated. A zero
/// `upper_bound` is accepted and describes the empty search; a zero
/// `worker_count` is rejected by [`SearchConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchConfig {
    worker_count: usize,
    upper_bound: u64,
}

impl SearchConfig {
    /// Validates and builds a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWorkers`] if `worker_count` is zero.
    pub const fn new(worker_count: usize, upper_bound: u64) -> Result<Self, ConfigError> {
        if worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(Self {
            worker_count,
            upper_bound,
        })
    }

    /// Number of workers the range is split across.
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Inclusive upper end of the search range.
    pub const fn upper_bound(&self) -> u64 {
        self.upper_bound
    }

    /// `true` when there is nothing to search (`upper_bound < 1`).
    pub const fn is_degenerate(&self) -> bool {
        self.upper_bound < 1
    }
}
