use std::collections::HashSet;
use std::time::{Duration, Instant};

use anyhow::bail;
use clap::Parser;
use flakeid::{LockFlakeGenerator, ThreadRandom, WallClock};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runtime configuration for the collision-count self-test.
///
/// The driver constructs one generator from these settings and requests IDs
/// in a tight loop for a bounded window, acting purely as an external caller
/// of the library contract. All values are parsed from CLI arguments or
/// environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid-cli",
    version,
    about = "Drives a flakeid generator for a bounded window and counts duplicate IDs"
)]
struct CliArgs {
    /// Region id encoded into every generated ID. Must be in [0, 3].
    ///
    /// Environment variable: `REGION_ID`
    #[arg(long, env = "REGION_ID", default_value_t = 1)]
    region_id: u64,

    /// Worker id encoded into every generated ID. Must be in [0, 127].
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", default_value_t = 1)]
    worker_id: u64,

    /// Business id encoded into every generated ID. Must be in [0, 127].
    ///
    /// Environment variable: `BUSINESS_ID`
    #[arg(long, env = "BUSINESS_ID", default_value_t = 2)]
    business_id: u64,

    /// Length of the generation window, in milliseconds.
    ///
    /// Environment variable: `RUN_MILLIS`
    #[arg(long, env = "RUN_MILLIS", default_value_t = 1_000)]
    run_millis: u64,
}

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let generator = LockFlakeGenerator::new(
        args.region_id,
        args.worker_id,
        args.business_id,
        WallClock,
        ThreadRandom,
    )?;

    info!(
        region_id = args.region_id,
        worker_id = args.worker_id,
        business_id = args.business_id,
        run_millis = args.run_millis,
        "starting self-test"
    );

    let deadline = Instant::now() + Duration::from_millis(args.run_millis);
    let mut seen = HashSet::new();
    let mut total: u64 = 0;
    let mut duplicates: u64 = 0;

    while Instant::now() <= deadline {
        let id = generator.next_id()?;
        if !seen.insert(id.to_raw()) {
            duplicates += 1;
        }
        total += 1;
    }

    info!(total, duplicates, "self-test finished");

    if duplicates > 0 {
        bail!("{duplicates} duplicate IDs out of {total}");
    }
    Ok(())
}
