//! One run of the binary, from parsed arguments to the exit status.

use crate::config::{CliArgs, RunConfig};
use anyhow::anyhow;
use primesweep::{
    AggregatedReport, BatchSink, DeliveryKind, ImmediateSink, Orchestrator, PartitionKind,
};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every worker joined and the results were printed.
    Completed,
    /// The config file was missing or invalid; nothing was searched.
    ConfigRejected,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub const fn code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::ConfigRejected => 1,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        Self::from(outcome.code())
    }
}

/// Loads the config named by `args`, runs the search and prints the results.
///
/// Search output goes to `out`, which is handed back once the run ends.
/// Configuration errors are written to `err` and end the run with
/// [`Outcome::ConfigRejected`] before any worker starts.
///
/// # Errors
///
/// Search faults and write failures on `out` or `err`.
pub async fn run<W, E>(args: CliArgs, mut out: W, err: &mut E) -> anyhow::Result<(Outcome, W)>
where
    W: Write + Send + 'static,
    E: Write,
{
    let config = match RunConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = ?e, "configuration rejected");
            writeln!(err, "Error: {e}")?;
            writeln!(err, "Failed to read config. Exiting.")?;
            return Ok((Outcome::ConfigRejected, out));
        }
    };

    #[cfg(feature = "tracing")]
    tracing::info!(
        workers = config.search.worker_count(),
        upper_bound = config.search.upper_bound(),
        partition = %config.partition,
        delivery = %config.delivery,
        "starting search"
    );

    writeln!(out, "{}", banner(&config))?;
    let orchestrator = Orchestrator::new(config.search, config.partition);

    match config.delivery {
        DeliveryKind::Immediate => {
            writeln!(out)?;
            let sink = Arc::new(ImmediateSink::new(out));
            let report = orchestrator.run(Arc::clone(&sink)).await?;
            out = Arc::into_inner(sink)
                .ok_or_else(|| anyhow!("output still held after all workers joined"))?
                .into_writer();
            if report == AggregatedReport::Empty {
                writeln!(out, "No numbers to check.")?;
            }
            writeln!(out)?;
        }
        DeliveryKind::Batch => {
            let report = orchestrator.run(Arc::new(BatchSink::new())).await?;
            match report.as_batch() {
                Some(batch) => {
                    writeln!(out)?;
                    writeln!(out, "{}", batch_header(config.partition))?;
                    write!(out, "{batch}")?;
                }
                None => writeln!(out, "No numbers to check.")?,
            }
        }
    }
    writeln!(out, "All threads completed.")?;
    out.flush()?;

    #[cfg(feature = "tracing")]
    tracing::info!("search finished");

    Ok((Outcome::Completed, out))
}

fn banner(config: &RunConfig) -> String {
    let layout = match config.partition {
        PartitionKind::Contiguous => "",
        PartitionKind::Interleaved => " (interleaved)",
    };
    let mode = match config.delivery {
        DeliveryKind::Immediate => "",
        DeliveryKind::Batch => " (batch mode)",
    };
    format!(
        "Starting {} threads{layout} to search 1 - {}{mode}",
        config.search.worker_count(),
        config.search.upper_bound(),
    )
}

const fn batch_header(kind: PartitionKind) -> &'static str {
    match kind {
        PartitionKind::Contiguous => "=== BATCH OUTPUT: All primes found ===",
        PartitionKind::Interleaved => "=== BATCH OUTPUT: Interleaved Assignment ===",
    }
}
