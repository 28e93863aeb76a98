//! The per-partition scan executed by each worker.
//!
//! A worker owns exactly one [`Partition`] and never looks at another
//! worker's values or buffer. Depending on the sink's [`DeliveryKind`] it
//! either streams every match through [`DeliverySink::record`] or buffers
//! them privately and hands the complete [`WorkerResult`] over once, when
//! its scan ends.

use crate::{
    DeliveryKind, DeliverySink, Match, Partition, Result, SearchError, TimeSource, WorkerResult,
    is_prime,
};
use tokio_util::sync::CancellationToken;

/// Values scanned between two checks of the abort token.
const ABORT_CHECK_INTERVAL: u64 = 1024;

/// What a worker did, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker_id: usize,
    /// Values tested.
    pub evaluated: u64,
    /// Values that matched.
    pub matched: usize,
}

/// Scans `partition` in increasing order and delivers matches to `sink`.
///
/// # Arguments
///
/// - `worker_id`: index of this worker; stamped on every [`Match`].
/// - `partition`: the values this worker owns.
/// - `sink`: shared delivery target.
/// - `clock`: source of discovery timestamps.
/// - `abort`: cancelled by the orchestrator when another worker faulted.
///
/// An empty partition returns immediately with zero matches. In batch mode
/// the (possibly empty) result is still handed to the sink.
///
/// # Errors
///
/// - [`SearchError::Aborted`] if `abort` was cancelled before the scan ended.
/// - Any error returned by the sink.
pub fn run_worker<S, T>(
    worker_id: usize,
    partition: &Partition,
    sink: &S,
    clock: &T,
    abort: &CancellationToken,
) -> Result<WorkerSummary>
where
    S: DeliverySink + ?Sized,
    T: TimeSource + ?Sized,
{
    let kind = sink.kind();
    let mut buffer = WorkerResult::new();
    let mut evaluated = 0_u64;
    let mut matched = 0_usize;

    for value in partition.values() {
        if evaluated % ABORT_CHECK_INTERVAL == 0 && abort.is_cancelled() {
            return Err(SearchError::Aborted);
        }
        evaluated += 1;

        if !is_prime(value) {
            continue;
        }
        matched += 1;
        let found = Match {
            value,
            worker_id,
            discovered_at: clock.now(),
        };
        match kind {
            DeliveryKind::Immediate => sink.record(found)?,
            DeliveryKind::Batch => buffer.push(found),
        }
    }

    if kind == DeliveryKind::Batch {
        sink.complete(worker_id, buffer)?;
    }

    Ok(WorkerSummary {
        worker_id,
        evaluated,
        matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AggregatedReport, BatchSink, ImmediateSink, LocalClock};

    #[test]
    fn streams_matches_in_increasing_order() {
        let sink = ImmediateSink::new(Vec::<u8>::new());
        let part = Partition::Contiguous { start: 11, end: 20 };

        let summary = run_worker(1, &part, &sink, &LocalClock, &CancellationToken::new()).unwrap();
        assert_eq!(
            summary,
            WorkerSummary {
                worker_id: 1,
                evaluated: 10,
                matched: 4
            }
        );

        let text = String::from_utf8(sink.into_writer()).unwrap();
        let values: Vec<u64> = text
            .lines()
            .map(|line| line.rsplit(' ').next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(values, vec![11, 13, 17, 19]);
        assert!(text.lines().all(|line| line.starts_with("[Thread-1] ")));
    }

    #[test]
    fn batch_mode_hands_off_once() {
        let sink = BatchSink::new();
        let part = Partition::Interleaved {
            offset: 2,
            stride: 3,
            upper_bound: 30,
        };

        run_worker(1, &part, &sink, &LocalClock, &CancellationToken::new()).unwrap();
        assert_eq!(sink.completed(), 1);

        let AggregatedReport::Batch(report) = sink.finalize().unwrap() else {
            panic!("expected a batch report");
        };
        assert_eq!(
            report.worker(1).unwrap().values().collect::<Vec<_>>(),
            vec![2, 5, 11, 17, 23, 29]
        );
    }

    #[test]
    fn empty_partition_yields_nothing() {
        let sink = BatchSink::new();
        let part = Partition::Interleaved {
            offset: 9,
            stride: 8,
            upper_bound: 3,
        };

        let summary = run_worker(8, &part, &sink, &LocalClock, &CancellationToken::new()).unwrap();
        assert_eq!(summary.evaluated, 0);
        assert_eq!(summary.matched, 0);
        assert_eq!(sink.completed(), 1);
    }

    #[test]
    fn stops_when_aborted() {
        let sink = ImmediateSink::new(Vec::<u8>::new());
        let part = Partition::Contiguous {
            start: 1,
            end: 10_000,
        };
        let abort = CancellationToken::new();
        abort.cancel();

        let err = run_worker(0, &part, &sink, &LocalClock, &abort).unwrap_err();
        assert!(matches!(err, SearchError::Aborted));
        assert_eq!(sink.emitted(), 0);
    }
}
