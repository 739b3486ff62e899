//! Host side of a speed test session
//!
//! The host invokes the routine, receives its serialized record and times
//! that handoff to derive the upload figure the routine leaves empty.

use crate::metrics::{format_fixed2, format_seconds, mebibytes, throughput_mbps, PerformanceMeasurement};
use crate::{CappedAllocator, Outcome, Result, SpeedSimError, SpeedTest, SpeedTestConfig, VERSION};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{error, info};
use uuid::Uuid;

/// Finished session as shown to the user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub payload_bytes: usize,
    pub download: String,
    pub dl_time: String,
    pub upload: String,
    pub ul_time: String,
    pub total_time: String,
    pub session_time: String,
    pub returned_bytes: usize,
    pub debug_logs: Vec<String>,
}

impl SessionReport {
    /// Human readable summary block
    pub fn render(&self) -> String {
        format!(
            "Run {}\nTotal time: {} s\nDownload:   {} Mbps ({} s)\nUpload:     {} Mbps ({} s)",
            self.run_id,
            self.total_time,
            self.download,
            self.dl_time,
            self.upload,
            self.ul_time
        )
    }
}

/// Runs measurements on behalf of a caller
#[derive(Debug, Clone)]
pub struct HostSession {
    config: SpeedTestConfig,
}

impl HostSession {
    pub fn new(config: SpeedTestConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SpeedSimError::Configuration(e.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SpeedTestConfig {
        &self.config
    }

    /// Run with the configured payload size
    pub async fn run(&self) -> Result<SessionReport> {
        self.run_bytes(self.config.payload_bytes()).await
    }

    /// Run with an explicit payload size in bytes
    pub async fn run_bytes(&self, size: usize) -> Result<SessionReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let session = PerformanceMeasurement::start("session");
        info!(%run_id, "Speed-test initiated (v{}) - {:.2} MB", VERSION, mebibytes(size));

        let mut test = SpeedTest::new(size)
            .with_allocator(CappedAllocator::new(self.config.max_payload_bytes()));
        if let Some(seed) = self.config.seed {
            test = test.with_seed(seed);
        }

        let (tx, rx) = oneshot::channel::<(Instant, Vec<u8>)>();
        let worker = tokio::task::spawn_blocking(move || -> Result<()> {
            let outcome = test.run();
            let handoff = Instant::now();
            let bytes = serde_json::to_vec(&outcome)?;
            tx.send((handoff, bytes))
                .map_err(|_| SpeedSimError::Transfer("host stopped listening".to_string()))
        });

        let (handoff, bytes) = match rx.await {
            Ok(received) => received,
            Err(_) => {
                return Err(match worker.await {
                    Ok(Err(e)) => e,
                    Ok(Ok(())) => SpeedSimError::Transfer("no result returned".to_string()),
                    Err(join_err) => SpeedSimError::Transfer(join_err.to_string()),
                });
            }
        };
        let outcome: Outcome = serde_json::from_slice(&bytes)?;
        let upload_elapsed = handoff.elapsed();
        worker
            .await
            .map_err(|e| SpeedSimError::Transfer(e.to_string()))??;

        let result = match outcome {
            Outcome::Success(result) => result,
            Outcome::Failure(failure) => {
                error!(%run_id, "Speed-test error: {}", failure.error);
                return Err(SpeedSimError::Execution {
                    message: failure.error,
                    debug_logs: failure.debug_logs,
                });
            }
        };

        let upload = format_fixed2(throughput_mbps(bytes.len(), upload_elapsed));
        let ul_time = format_seconds(upload_elapsed);
        info!(
            %run_id,
            "Speed-test complete (v{}): ↓ {} Mbps ({} s), ↑ {} Mbps ({} s), total time {} s, returned bytes: {}",
            VERSION,
            result.download,
            result.dl_time,
            upload,
            ul_time,
            result.total_time,
            bytes.len()
        );

        Ok(SessionReport {
            run_id,
            started_at,
            payload_bytes: size,
            download: result.download,
            dl_time: result.dl_time,
            upload,
            ul_time,
            total_time: result.total_time,
            session_time: format_seconds(session.elapsed()),
            returned_bytes: bytes.len(),
            debug_logs: result.debug_logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn small_config() -> SpeedTestConfig {
        SpeedTestConfig {
            payload_mb: 1,
            max_payload_mb: 2,
            seed: Some(5),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_session_report() {
        let host = HostSession::new(small_config()).unwrap();
        let report = host.run().await.unwrap();

        assert_eq!(report.payload_bytes, 1024 * 1024);
        assert!(report.returned_bytes > 0);
        assert!(report.download.parse::<f64>().unwrap() >= 0.0);
        assert!(report.upload.parse::<f64>().unwrap() >= 0.0);
        assert!(report.ul_time.parse::<f64>().unwrap() >= 0.0);
        assert_eq!(report.debug_logs[0], "▶️ Speed-test started - 1 MB");

        let rendered = report.render();
        assert!(rendered.contains(&format!("Download:   {} Mbps", report.download)));
        assert!(rendered.contains(&format!("Upload:     {} Mbps", report.upload)));
    }

    #[tokio::test]
    async fn test_each_run_gets_new_id() {
        let host = HostSession::new(small_config()).unwrap();
        let first = host.run_bytes(4096).await.unwrap();
        let second = host.run_bytes(4096).await.unwrap();
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn test_payload_over_cap_is_execution_error() {
        let host = HostSession::new(small_config()).unwrap();
        let err = host.run_bytes(3 * 1024 * 1024).await.unwrap_err();

        match err {
            SpeedSimError::Execution { message, debug_logs } => {
                assert!(message.contains("exceeds payload limit"));
                assert!(debug_logs[0].contains("3 MB"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SpeedTestConfig { payload_mb: 500, ..Default::default() };
        let err = HostSession::new(config).unwrap_err();
        assert!(matches!(err, SpeedSimError::Configuration(_)));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_session_logs_summary() {
        let host = HostSession::new(small_config()).unwrap();
        host.run_bytes(8192).await.unwrap();
        assert!(logs_contain("Speed-test initiated"));
        assert!(logs_contain("Speed-test complete"));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = SessionReport {
            run_id: Uuid::nil(),
            started_at: Utc::now(),
            payload_bytes: 10,
            download: "1.00".to_string(),
            dl_time: "0.01".to_string(),
            upload: "2.00".to_string(),
            ul_time: "0.00".to_string(),
            total_time: "0.02".to_string(),
            session_time: "0.03".to_string(),
            returned_bytes: 120,
            debug_logs: vec![],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["dlTime"], "0.01");
        assert_eq!(value["returnedBytes"], 120);
        assert_eq!(value["runId"], "00000000-0000-0000-0000-000000000000");
    }
}
