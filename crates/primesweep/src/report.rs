use crate::Timestamp;
use chrono::{DateTime, Local};
use core::fmt;
use std::collections::BTreeMap;

/// A qualifying value, stamped with the worker that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// The value that satisfied the predicate.
    pub value: u64,
    /// Index of the worker whose partition contains `value`.
    pub worker_id: usize,
    /// Wall-clock instant of the discovery.
    pub discovered_at: DateTime<Local>,
}

impl fmt::Display for Match {
    /// Streamed line format: `[Thread-<id>] <timestamp> Found prime: <value>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Thread-{}] {} Found prime: {}",
            self.worker_id,
            Timestamp(&self.discovered_at),
            self.value
        )
    }
}

/// Matches found by a single worker, in increasing order of value.
///
/// Ordering follows from the sequential scan of a partition; `push` does not
/// re-sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerResult {
    matches: Vec<Match>,
}

impl WorkerResult {
    pub const fn new() -> Self {
        Self {
            matches: Vec::new(),
        }
    }

    pub fn push(&mut self, m: Match) {
        debug_assert!(
            self.matches.last().is_none_or(|last| last.value < m.value),
            "matches must be pushed in increasing order"
        );
        self.matches.push(m);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// The matched values, without timestamps.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.matches.iter().map(|m| m.value)
    }
}

impl fmt::Display for WorkerResult {
    /// Comma-separated values, or `none`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matches.is_empty() {
            return f.write_str("none");
        }
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Deterministic result of a batch search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    per_worker: BTreeMap<usize, WorkerResult>,
    total_count: usize,
}

impl BatchReport {
    pub(crate) fn from_results(per_worker: BTreeMap<usize, WorkerResult>) -> Self {
        let total_count = per_worker.values().map(WorkerResult::len).sum();
        Self {
            per_worker,
            total_count,
        }
    }

    /// Results keyed by worker id, in worker order.
    pub const fn per_worker(&self) -> &BTreeMap<usize, WorkerResult> {
        &self.per_worker
    }

    pub fn worker(&self, worker_id: usize) -> Option<&WorkerResult> {
        self.per_worker.get(&worker_id)
    }

    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    /// Every matched value across all workers, in worker order.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.per_worker.values().flat_map(WorkerResult::values)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (worker_id, result) in &self.per_worker {
            writeln!(f, "Thread-{worker_id} found: {result}")?;
        }
        writeln!(f)?;
        writeln!(f, "Total primes found: {}", self.total_count)
    }
}

/// Outcome of a completed search, built once every worker has joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregatedReport {
    /// Nothing to search (`upper_bound < 1`); no worker was spawned.
    Empty,
    /// Matches were streamed to the sink's output as they were found.
    Streamed {
        /// Number of lines written.
        emitted: usize,
    },
    /// Matches were collected per worker and merged.
    Batch(BatchReport),
}

impl AggregatedReport {
    /// Total number of matches delivered, whatever the delivery mode.
    pub const fn total_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Streamed { emitted } => *emitted,
            Self::Batch(report) => report.total_count(),
        }
    }

    pub const fn as_batch(&self) -> Option<&BatchReport> {
        match self {
            Self::Batch(report) => Some(report),
            _ => None,
        }
    }
}
