//! `primesweep`: searches `1..=max_number` for primes across `threads`
//! workers, as configured by a key-value file.
//!
//! The partition and delivery strategies are picked on the command line:
//!
//! ```bash
//! primesweep --config config.txt --partition interleaved --delivery batch
//! ```

mod app;
mod config;
mod pause;
mod telemetry;

use app::{Outcome, run};
use clap::Parser;
use config::CliArgs;
use std::io;
use std::process::ExitCode;
use telemetry::init_telemetry;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;

    let pause = pause::should_pause(!args.no_pause);
    let (outcome, _) = run(args, io::stdout(), &mut io::stderr()).await?;

    if outcome == Outcome::Completed && pause {
        pause::wait_for_keypress()?;
    }
    Ok(outcome.into())
}
