//! The measurement routine
//!
//! A run allocates a buffer of the requested size, fills it with random bytes
//! while timing the fill, and reports the fill rate as a "download"
//! throughput. Upload is left to the host, which times the transfer of the
//! returned record itself.

use crate::metrics::{format_fixed2, format_seconds, mebibytes, throughput_mbps, PerformanceMeasurement};
use crate::{payload, BufferAllocator, DebugLog, ErrorResult, Measurement, Outcome, Result, SpeedSimError, SystemAllocator};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::warn;

/// Run the routine for `size` bytes with the system allocator
pub fn measure(size: usize) -> Outcome {
    SpeedTest::new(size).run()
}

/// A configured, reusable measurement
#[derive(Debug, Clone)]
pub struct SpeedTest<A = SystemAllocator> {
    size: usize,
    allocator: A,
    seed: Option<u64>,
}

impl SpeedTest<SystemAllocator> {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            allocator: SystemAllocator,
            seed: None,
        }
    }
}

impl<A: BufferAllocator> SpeedTest<A> {
    /// Replace the buffer allocator
    pub fn with_allocator<B: BufferAllocator>(self, allocator: B) -> SpeedTest<B> {
        SpeedTest {
            size: self.size,
            allocator,
            seed: self.seed,
        }
    }

    /// Seed the fill PRNG instead of drawing a seed from the OS
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run once and return the record for the host
    pub fn run(&self) -> Outcome {
        self.run_detailed().into()
    }

    /// Run once, keeping the unrounded timings on success
    pub fn run_detailed(&self) -> std::result::Result<Measurement, ErrorResult> {
        let total = PerformanceMeasurement::start("total");
        let mut log = DebugLog::new();
        log.push(format!("▶️ Speed-test started - {} MB", mebibytes(self.size)));

        match self.download_phase(&mut log) {
            Ok((download_elapsed, download_mbps)) => {
                log.push("Preparing return value (without payload)...");
                let total_elapsed = total.elapsed();
                log.push(format!("🏁 Speed-test complete in {} s", format_seconds(total_elapsed)));

                Ok(Measurement {
                    bytes: self.size,
                    download_elapsed,
                    total_elapsed,
                    download_mbps,
                    debug_logs: log.into_lines(),
                })
            }
            Err(err) => {
                warn!("Speed-test failed for {} bytes: {}", self.size, err);
                log.push(format!("❌ Error: {}", err));
                Err(ErrorResult {
                    error: err.to_string(),
                    debug_logs: log.into_lines(),
                })
            }
        }
    }

    fn download_phase(&self, log: &mut DebugLog) -> Result<(Duration, f64)> {
        if self.size == 0 {
            return Err(SpeedSimError::InvalidSize { size: self.size });
        }

        log.push("Starting download simulation...");
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let download = PerformanceMeasurement::start("download");
        let buffer = payload::generate(self.size, &self.allocator, &mut rng)?;
        let (_, elapsed) = download.finish();

        let mbps = throughput_mbps(buffer.len(), elapsed);
        log.push(format!(
            "⬇️ Download (simulated) {} bytes in {} s → {} Mbps",
            buffer.len(),
            format_seconds(elapsed),
            format_fixed2(mbps)
        ));
        Ok((elapsed, mbps))
    }
}

impl<A: BufferAllocator + 'static> SpeedTest<A> {
    /// Run on the blocking pool for async hosts
    pub async fn run_async(self) -> Outcome {
        self.run_async_detailed().await.into()
    }

    pub async fn run_async_detailed(self) -> std::result::Result<Measurement, ErrorResult> {
        let size = self.size;
        match tokio::task::spawn_blocking(move || self.run_detailed()).await {
            Ok(result) => result,
            Err(join_err) => {
                warn!("Speed-test task for {} bytes did not complete: {}", size, join_err);
                let mut log = DebugLog::new();
                log.push(format!("▶️ Speed-test started - {} MB", mebibytes(size)));
                log.push(format!("❌ Error: {}", join_err));
                Err(ErrorResult {
                    error: join_err.to_string(),
                    debug_logs: log.into_lines(),
                })
            }
        }
    }
}
