//! Payload sweep across several buffer sizes

use anyhow::{bail, Result};
use speed_sim_core::{metrics::mebibytes, SpeedTest};
use std::time::Duration;
use tracing::info;

/// 1 MiB, 10 MiB and 100 MiB
pub const DEFAULT_SIZES: [usize; 3] = [1024 * 1024, 10 * 1024 * 1024, 100 * 1024 * 1024];

/// One row of the sweep
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub size: usize,
    pub elapsed: Duration,
    pub throughput_mbps: f64,
}

impl SweepResult {
    fn print(&self) {
        println!("📊 {:.2} MB", mebibytes(self.size));
        println!("   Bytes: {}", self.size);
        println!("   Fill time: {:.3}s", self.elapsed.as_secs_f64());
        println!("   Throughput: {:.2} Mbps", self.throughput_mbps);
    }
}

/// Measure every size in turn
pub async fn sweep(sizes: &[usize]) -> Result<Vec<SweepResult>> {
    let mut results = Vec::with_capacity(sizes.len());
    for &size in sizes {
        match SpeedTest::new(size).run_async_detailed().await {
            Ok(measurement) => results.push(SweepResult {
                size,
                elapsed: measurement.download_elapsed,
                throughput_mbps: measurement.download_mbps,
            }),
            Err(failure) => bail!("{} byte run failed: {}", size, failure.error),
        }
    }
    Ok(results)
}

/// Throughput of each row relative to the first
pub fn relative_to_baseline(results: &[SweepResult]) -> Vec<f64> {
    let Some(baseline) = results.first().map(|r| r.throughput_mbps) else {
        return Vec::new();
    };
    results.iter().map(|r| r.throughput_mbps / baseline).collect()
}

pub async fn run_payload_sweep(sizes: &[usize]) -> Result<()> {
    println!("🚀 Speed Sim - Payload Sweep");
    println!("============================");
    println!();

    let results = sweep(sizes).await?;
    for result in &results {
        result.print();
        println!();
    }

    println!("🔄 Relative to {:.2} MB baseline:", results.first().map_or(0.0, |r| mebibytes(r.size)));
    for (result, ratio) in results.iter().zip(relative_to_baseline(&results)) {
        println!("   {:>8.2} MB: {:.2}x", mebibytes(result.size), ratio);
    }
    println!();
    println!("{}", "─".repeat(60));

    info!("Payload sweep finished with {} sizes", results.len());
    Ok(())
}
