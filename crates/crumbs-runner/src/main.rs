//! crumbs: resolve a baker's reward payouts for one cycle.
//!
//! Loads the payout configuration, reads the cycle snapshot, runs the
//! resolution pipeline with a flat per-transfer fee and prints the report
//! and transfer batches as JSON on stdout.

mod config;
mod snapshot;

use std::path::PathBuf;

use clap::Parser;
use crumbs_engine::client::DEFAULT_TRANSFER_FEE;
use crumbs_engine::{CycleResolver, FixedFeeEstimator};
use crumbs_types::{Cycle, Mutez};
use tracing::info;

use crate::snapshot::{SnapshotSource, DEFAULT_SNAPSHOT_DIR};

/// Arguments for the payout resolver.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Reward cycle to resolve.
    cycle: Cycle,

    /// Payout configuration file.
    #[clap(long, env = "CRUMBS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding `<cycle>.json` snapshots.
    #[clap(long, env = "CRUMBS_SNAPSHOTS", default_value = DEFAULT_SNAPSHOT_DIR)]
    snapshots: PathBuf,

    /// Network fee charged per transfer, in mutez.
    #[clap(long, default_value_t = DEFAULT_TRANSFER_FEE.as_u128())]
    transfer_fee: u128,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("crumbs=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config_path = config::config_path(args.config);
    let config = config::load(&config_path)?;
    info!(
        path = %config_path.display(),
        baker = %config.baking_address,
        cycle = args.cycle,
        "resolving payouts"
    );

    let resolver = CycleResolver::new(
        config,
        SnapshotSource::new(args.snapshots),
        FixedFeeEstimator::with_fee(Mutez::new(args.transfer_fee)),
    );
    let resolved = resolver.resolve_cycle(args.cycle)?;

    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
