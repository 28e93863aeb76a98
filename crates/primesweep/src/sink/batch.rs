use crate::{
    AggregatedReport, BatchReport, DeliveryKind, DeliverySink, Match, Result, SearchError,
    WorkerResult,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Collects one complete [`WorkerResult`] per worker and merges them on
/// [`finalize`](DeliverySink::finalize).
///
/// Workers never touch the sink while scanning; the lock is only taken for
/// the single hand-off at the end of each scan. The merged report is keyed by
/// worker id, so it does not depend on the order in which workers finished.
#[derive(Debug, Default)]
pub struct BatchSink {
    results: Mutex<BTreeMap<usize, WorkerResult>>,
}

impl BatchSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of workers that have handed off so far.
    pub fn completed(&self) -> usize {
        self.results.lock().len()
    }
}

impl DeliverySink for BatchSink {
    fn kind(&self) -> DeliveryKind {
        DeliveryKind::Batch
    }

    fn record(&self, _m: Match) -> Result<()> {
        Err(SearchError::UnexpectedRecord)
    }

    fn complete(&self, worker_id: usize, result: WorkerResult) -> Result<()> {
        let mut results = self.results.lock();
        if results.contains_key(&worker_id) {
            return Err(SearchError::DuplicateHandOff { worker_id });
        }
        results.insert(worker_id, result);
        Ok(())
    }

    fn finalize(&self) -> Result<AggregatedReport> {
        let results = core::mem::take(&mut *self.results.lock());
        Ok(AggregatedReport::Batch(BatchReport::from_results(results)))
    }
}
