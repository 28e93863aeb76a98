//! Worker pool lifecycle for a single search.
//!
//! The [`Orchestrator`] composes a [`PartitionKind`] with any
//! [`DeliverySink`] and drives one search through
//! `Configured → Partitioned → Running → Joined → Reported`:
//!
//! 1. Partition `[1, upper_bound]` (an empty range reports
//!    [`AggregatedReport::Empty`] without spawning anything).
//! 2. Spawn one blocking task per non-empty partition into a [`JoinSet`].
//!    Empty partitions hand an empty result to the sink inline.
//! 3. Wait for every task. The first fault cancels a shared
//!    [`CancellationToken`] so the remaining scans stop early; the fault is
//!    returned once all tasks have terminated. No partial report is produced.
//! 4. Finalize the sink into the report.

use crate::{
    AggregatedReport, DeliverySink, LocalClock, PartitionKind, Result, SearchConfig, SearchError,
    TimeSource, WorkerResult, WorkerSummary, partition, run_worker,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Tokio's default cap on blocking threads.
const DEFAULT_BLOCKING_THREADS: usize = 512;

/// Lifecycle stage of an [`Orchestrator`]. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum OrchestratorState {
    Configured,
    Partitioned,
    Running,
    Joined,
    Reported,
}

/// Runs one search over a pool of concurrent workers.
///
/// `run` consumes the orchestrator, so a search runs exactly once.
///
/// # Example
///
/// ```
/// use primesweep::{BatchSink, Orchestrator, PartitionKind, SearchConfig};
/// use std::sync::Arc;
///
/// let config = SearchConfig::new(3, 30).unwrap();
/// let report = Orchestrator::new(config, PartitionKind::Interleaved)
///     .run_blocking(Arc::new(BatchSink::new()))
///     .unwrap();
/// assert_eq!(report.total_count(), 10);
/// ```
#[derive(Debug)]
pub struct Orchestrator<T = LocalClock> {
    config: SearchConfig,
    partition_kind: PartitionKind,
    clock: Arc<T>,
    state: OrchestratorState,
}

impl Orchestrator<LocalClock> {
    /// Creates an orchestrator stamping matches with the local system clock.
    pub fn new(config: SearchConfig, partition_kind: PartitionKind) -> Self {
        Self::with_clock(config, partition_kind, LocalClock)
    }
}

impl<T> Orchestrator<T>
where
    T: TimeSource + 'static,
{
    /// Creates an orchestrator with a custom [`TimeSource`].
    pub fn with_clock(config: SearchConfig, partition_kind: PartitionKind, clock: T) -> Self {
        Self {
            config,
            partition_kind,
            clock: Arc::new(clock),
            state: OrchestratorState::Configured,
        }
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub const fn partition_kind(&self) -> PartitionKind {
        self.partition_kind
    }

    pub(crate) const fn state(&self) -> OrchestratorState {
        self.state
    }

    fn advance(&mut self, next: OrchestratorState) {
        debug_assert!(next > self.state, "{:?} -> {next:?}", self.state);
        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?self.state, to = ?next, "orchestrator transition");
        self.state = next;
    }

    /// Runs the search to completion and returns the sink's report.
    ///
    /// Must be called from within a multi-threaded Tokio runtime; the scans
    /// run on its blocking pool. Scans beyond the pool's thread limit (512 by
    /// default) queue until a thread frees up; [`Orchestrator::run_blocking`]
    /// sizes its pool to the worker count.
    ///
    /// # Errors
    ///
    /// - [`SearchError::WorkerFault`] or [`SearchError::WorkerPanicked`] if any
    ///   worker failed. Remaining workers are aborted first.
    /// - Any error from [`DeliverySink::finalize`].
    pub async fn run<S>(mut self, sink: Arc<S>) -> Result<AggregatedReport>
    where
        S: DeliverySink + ?Sized + 'static,
    {
        self.execute(sink).await
    }

    /// Drives the state machine, leaving the orchestrator in its final stage.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            skip_all,
            fields(
                upper_bound = self.config.upper_bound(),
                workers = self.config.worker_count(),
                partition = %self.partition_kind,
                delivery = %sink.kind(),
            )
        )
    )]
    pub(crate) async fn execute<S>(&mut self, sink: Arc<S>) -> Result<AggregatedReport>
    where
        S: DeliverySink + ?Sized + 'static,
    {
        if self.config.is_degenerate() {
            #[cfg(feature = "tracing")]
            tracing::debug!("empty range, no workers spawned");
            self.advance(OrchestratorState::Reported);
            return Ok(AggregatedReport::Empty);
        }

        let partitions = partition(
            self.config.upper_bound(),
            self.config.worker_count(),
            self.partition_kind,
        );
        self.advance(OrchestratorState::Partitioned);

        // Empty partitions never reach a task.
        for (worker_id, part) in partitions.iter().enumerate() {
            if part.is_empty() {
                sink.complete(worker_id, WorkerResult::new())
                    .map_err(|e| e.in_worker(worker_id))?;
            }
        }

        let abort = CancellationToken::new();
        let mut workers = JoinSet::new();
        for (worker_id, part) in partitions.into_iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            let sink = Arc::clone(&sink);
            let clock = Arc::clone(&self.clock);
            let abort = abort.clone();
            workers.spawn_blocking(move || {
                catch_unwind(AssertUnwindSafe(|| {
                    run_worker(worker_id, &part, &*sink, &*clock, &abort)
                }))
                .unwrap_or(Err(SearchError::WorkerPanicked { worker_id }))
                .map_err(|e| e.in_worker(worker_id))
            });
        }
        self.advance(OrchestratorState::Running);

        let fault = join_all(&mut workers, &abort).await;
        self.advance(OrchestratorState::Joined);
        if let Some(err) = fault {
            return Err(err);
        }

        let report = sink.finalize()?;
        self.advance(OrchestratorState::Reported);
        Ok(report)
    }

    /// Runs the search on a freshly built multi-threaded Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`SearchError::Runtime`] if the runtime cannot be built, otherwise as
    /// [`Orchestrator::run`].
    pub fn run_blocking<S>(self, sink: Arc<S>) -> Result<AggregatedReport>
    where
        S: DeliverySink + ?Sized + 'static,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("primesweep-worker")
            .max_blocking_threads(self.config.worker_count().max(DEFAULT_BLOCKING_THREADS))
            .build()
            .map_err(SearchError::Runtime)?;
        runtime.block_on(self.run(sink))
    }
}

/// Join barrier: waits for every task, returning the first fault observed.
async fn join_all(
    workers: &mut JoinSet<Result<WorkerSummary>>,
    abort: &CancellationToken,
) -> Option<SearchError> {
    let mut fault = None;

    while let Some(joined) = workers.join_next().await {
        let outcome = joined.unwrap_or(Err(SearchError::Aborted));
        match outcome {
            Ok(_summary) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    worker = _summary.worker_id,
                    evaluated = _summary.evaluated,
                    matched = _summary.matched,
                    "worker finished"
                );
            }
            // Workers stopped by the token are a consequence, not the cause.
            Err(SearchError::Aborted) if fault.is_some() => {}
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!("{err}");
                if fault.is_none() {
                    abort.cancel();
                    fault = Some(err);
                }
            }
        }
    }

    fault
}
