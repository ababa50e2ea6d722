//! Detect the CPU, bind a tier and print a few values
//!
//! Run with `RUST_LOG=debug` to see the probe decisions, or set
//! `UNIVERSAL_RNG_MAX_TIER=sse2` to pin a narrower tier.

use tracing::info;
use tracing_subscriber::EnvFilter;
use universal_rng_core::{CapabilityReport, RngConfig, UniversalRng};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let report = CapabilityReport::detect();
    println!("CPU feature detection: {report}");

    let config = RngConfig::new(42).apply_env()?;
    let mut rng = UniversalRng::with_config(&config)?;
    info!(tier = rng.implementation_name(), "generator bound");
    println!("Using {} implementation ({} lanes)", rng.implementation_name(), rng.lanes());

    println!("\nFirst 5 u64 values:");
    for _ in 0..5 {
        println!("  {:#018x}", rng.next_u64());
    }

    println!("\nFirst 3 doubles:");
    for _ in 0..3 {
        println!("  {:.17}", rng.next_double());
    }

    let mut batch = [0u64; 10];
    rng.next_batch(&mut batch, 10);
    println!("\nBatch of {}:", batch.len());
    for value in batch {
        println!("  {value:#018x}");
    }

    rng.release();
    Ok(())
}
