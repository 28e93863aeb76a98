use crate::{AggregatedReport, DeliveryKind, DeliverySink, Match, Result, WorkerResult};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Streams each match as one line to a writer, as soon as it is recorded.
///
/// The writer is guarded by a mutex held for exactly one line, so lines
/// never interleave while the scans themselves run unserialized. Line order
/// across workers is whatever order the workers reach the lock in.
///
/// Each line shows the match's own `discovered_at`, taken by the worker before
/// it reaches the lock. Timestamps from different workers can therefore
/// appear out of order; within one worker they never go backwards.
///
/// # Example
///
/// ```
/// use primesweep::{DeliverySink, ImmediateSink};
///
/// let sink = ImmediateSink::new(Vec::<u8>::new());
/// let report = sink.finalize().unwrap();
/// assert_eq!(report.total_count(), 0);
/// assert!(sink.into_writer().is_empty());
/// ```
#[derive(Debug)]
pub struct ImmediateSink<W> {
    out: Mutex<W>,
    emitted: AtomicUsize,
}

impl<W: Write + Send> ImmediateSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            emitted: AtomicUsize::new(0),
        }
    }

    /// Number of lines written so far.
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> DeliverySink for ImmediateSink<W> {
    fn kind(&self) -> DeliveryKind {
        DeliveryKind::Immediate
    }

    fn record(&self, m: Match) -> Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{m}")?;
        self.emitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn complete(&self, _worker_id: usize, _result: WorkerResult) -> Result<()> {
        // Everything was already streamed through `record`.
        Ok(())
    }

    fn finalize(&self) -> Result<AggregatedReport> {
        self.out.lock().flush()?;
        Ok(AggregatedReport::Streamed {
            emitted: self.emitted(),
        })
    }
}
