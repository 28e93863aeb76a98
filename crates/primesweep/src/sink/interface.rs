use crate::{AggregatedReport, Match, Result, WorkerResult};
use core::fmt;

/// How matches travel from workers to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeliveryKind {
    /// Each match is written out as soon as it is found.
    #[default]
    Immediate,
    /// Each worker buffers its matches and hands them over once, at the end.
    Batch,
}

impl fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => f.write_str("immediate"),
            Self::Batch => f.write_str("batch"),
        }
    }
}

/// The only state shared between workers: where their matches go.
///
/// A sink is shared behind an `Arc` by every worker of a search. Streaming
/// sinks receive individual matches through [`record`]; batching sinks
/// receive a complete [`WorkerResult`] per worker through [`complete`]. Once
/// every worker has joined, the orchestrator calls [`finalize`] exactly once.
///
/// Implementations synchronize internally; no lock may be held across calls.
///
/// [`record`]: DeliverySink::record
/// [`complete`]: DeliverySink::complete
/// [`finalize`]: DeliverySink::finalize
pub trait DeliverySink: Send + Sync {
    /// The delivery discipline this sink implements. Workers use it to decide
    /// whether to stream or buffer.
    fn kind(&self) -> DeliveryKind;

    /// Delivers a single match during a scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the match cannot be delivered. The orchestrator
    /// treats this as a fault of the calling worker.
    fn record(&self, m: Match) -> Result<()>;

    /// Hands over the complete result of `worker_id` after its scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be accepted.
    fn complete(&self, worker_id: usize, result: WorkerResult) -> Result<()>;

    /// Produces the final report. Called once, after all workers joined.
    ///
    /// # Errors
    ///
    /// Returns an error if pending output cannot be flushed.
    fn finalize(&self) -> Result<AggregatedReport>;
}
