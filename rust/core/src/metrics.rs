//! Throughput math and timing helpers

use std::time::{Duration, Instant};

/// Smallest elapsed time used as a divisor when computing throughput.
///
/// A fill phase that completes within the clock resolution would otherwise
/// divide by zero; the rate is computed against this floor instead.
pub const MIN_MEASURABLE_ELAPSED: Duration = Duration::from_micros(1);

/// Bytes per mebibyte, used for the size shown in log lines
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Throughput in decimal megabits per second.
///
/// `elapsed` is floored at [`MIN_MEASURABLE_ELAPSED`], so the result is
/// always finite and non-negative.
pub fn throughput_mbps(bytes: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.max(MIN_MEASURABLE_ELAPSED).as_secs_f64();
    (bytes as f64 * 8.0) / seconds / 1e6
}

/// Size in mebibytes
pub fn mebibytes(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}

/// Render a value with two decimals
pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

/// Render a duration as seconds with two decimals
pub fn format_seconds(elapsed: Duration) -> String {
    format_fixed2(elapsed.as_secs_f64())
}

/// Named stopwatch for one phase of a measurement
#[derive(Debug)]
pub struct PerformanceMeasurement {
    start_time: Instant,
    operation_name: String,
}

impl PerformanceMeasurement {
    /// Start a new performance measurement
    pub fn start(operation_name: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            operation_name: operation_name.into(),
        }
    }

    /// Finish the measurement and return the elapsed time
    pub fn finish(self) -> (String, Duration) {
        (self.operation_name, self.start_time.elapsed())
    }

    /// Get elapsed time without finishing
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn name(&self) -> &str {
        &self.operation_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_one_mib_per_second() {
        let mbps = throughput_mbps(1_048_576, Duration::from_secs(1));
        assert!((mbps - 8.388608).abs() < 1e-9, "mbps was {mbps}");
    }

    #[test]
    fn test_throughput_zero_elapsed_uses_floor() {
        let mbps = throughput_mbps(1_000, Duration::ZERO);
        assert!(mbps.is_finite());
        // 8000 bits in one microsecond
        assert!((mbps - 8_000.0).abs() < 1e-6, "mbps was {mbps}");
    }

    #[test]
    fn test_throughput_zero_bytes() {
        assert_eq!(throughput_mbps(0, Duration::from_millis(5)), 0.0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_fixed2(8.388608), "8.39");
        assert_eq!(format_fixed2(0.0), "0.00");
        assert_eq!(format_seconds(Duration::from_millis(1234)), "1.23");
        assert_eq!(mebibytes(512 * 1024), 0.5);
    }

    #[test]
    fn test_performance_measurement() {
        let measurement = PerformanceMeasurement::start("download");
        assert_eq!(measurement.name(), "download");
        std::thread::sleep(Duration::from_millis(10));

        let (operation_name, duration) = measurement.finish();
        assert_eq!(operation_name, "download");
        assert!(duration.as_millis() >= 10);
    }
}
