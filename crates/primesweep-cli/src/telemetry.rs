//! Log output for the `primesweep` binary.
//!
//! Events go to stderr so that stdout carries only the search output. The
//! filter is read from `RUST_LOG` and falls back to `warn`, which keeps a
//! normal run silent apart from worker faults.
//!
//! ```bash
//! RUST_LOG=primesweep=debug primesweep --delivery batch
//! ```

use std::io;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_thread_names(true)
                .with_thread_ids(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;
    Ok(())
}
