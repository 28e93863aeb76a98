//! # primesweep
//!
//! A concurrent search over the integer range `[1, N]`. The range is split
//! across `W` workers, each worker tests its values for primality, and the
//! matches are delivered to a sink.
//!
//! Two independent strategies shape a search:
//!
//! - **Partitioning** ([`PartitionKind`]): contiguous blocks or interleaved
//!   strides. Both cover every value exactly once.
//! - **Delivery** ([`DeliverySink`]): [`ImmediateSink`] streams one line per
//!   match as it is found; [`BatchSink`] collects a sorted result per worker
//!   and merges them into a deterministic [`BatchReport`].
//!
//! The [`Orchestrator`] composes any partitioning with any sink over a pool of
//! blocking Tokio tasks and returns an [`AggregatedReport`] once every worker
//! has joined. A fault in any worker aborts the search as a whole.
//!
//! ```
//! use primesweep::{BatchSink, Orchestrator, PartitionKind, SearchConfig};
//! use std::sync::Arc;
//!
//! let config = SearchConfig::new(3, 30).unwrap();
//! let report = Orchestrator::new(config, PartitionKind::Contiguous)
//!     .run_blocking(Arc::new(BatchSink::new()))
//!     .unwrap();
//!
//! let batch = report.as_batch().unwrap();
//! assert_eq!(batch.worker(2).unwrap().to_string(), "23, 29");
//! assert_eq!(batch.total_count(), 10);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit orchestration and worker events through
//!   [`tracing`](https://docs.rs/tracing).

mod config;
mod error;
mod orchestrator;
mod partition;
mod prime;
mod report;
mod sink;
mod time;
mod worker;


pub use crate::config::*;
pub use crate::error::*;
pub use crate::orchestrator::*;
pub use crate::partition::*;
pub use crate::prime::*;
pub use crate::report::*;
pub use crate::sink::*;
pub use crate::time::*;
pub use crate::worker::*;
