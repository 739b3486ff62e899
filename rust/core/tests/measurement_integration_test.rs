//! End-to-end checks of the routine and host session

use speed_sim_core::prelude::*;
use speed_sim_core::metrics::throughput_mbps;

#[test]
fn test_routine_record_shape() -> Result<()> {
    println!("🧪 Measuring 1 MiB");

    let outcome = measure(1_048_576);
    let json = serde_json::to_value(&outcome)?;

    println!("📊 Returned record: {}", json);

    assert!(json["download"].is_string());
    assert!(json["upload"].is_null());
    assert!(json["totalTime"].is_string());
    assert!(json["dlTime"].is_string());
    assert!(json["ulTime"].is_null());
    assert!(json["debugLogs"][0].as_str().unwrap_or_default().contains("1 MB"));

    println!("✅ Record shape verified");
    Ok(())
}

#[test]
fn test_various_sizes_report_their_own_size() {
    for size in [1usize, 1000, 256 * 1024, 3 * 1024 * 1024] {
        let measurement = SpeedTest::new(size).run_detailed().expect("run should succeed");
        assert_eq!(measurement.bytes, size);
        assert!(measurement.download_mbps.is_finite());
        assert!(measurement.download_mbps >= 0.0);
        assert_eq!(
            measurement.download_mbps,
            throughput_mbps(size, measurement.download_elapsed)
        );
        assert!(measurement.debug_logs[2].contains(&format!(" {} bytes ", size)));
    }
}

#[test]
fn test_failure_record_round_trips_to_host() -> Result<()> {
    let outcome = SpeedTest::new(10_000)
        .with_allocator(CappedAllocator::new(100))
        .run();

    let bytes = serde_json::to_vec(&outcome)?;
    let decoded: Outcome = serde_json::from_slice(&bytes)?;

    let failure = decoded.failure().expect("capped run must fail");
    assert!(!failure.error.is_empty());
    assert!(!failure.debug_logs.is_empty());
    assert!(failure.debug_logs[0].contains("MB"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_runs_report_own_throughput() {
    println!("🔄 Running routines in parallel");

    let sizes = [32 * 1024usize, 1024 * 1024, 4 * 1024 * 1024];
    let handles: Vec<_> = sizes
        .iter()
        .map(|&size| tokio::spawn(SpeedTest::new(size).run_async_detailed()))
        .collect();

    for (handle, size) in handles.into_iter().zip(sizes) {
        let measurement = handle.await.expect("task panicked").expect("run should succeed");
        println!("  {} bytes → {:.2} Mbps", size, measurement.download_mbps);
        assert_eq!(measurement.bytes, size);
        assert_eq!(
            measurement.download_mbps,
            throughput_mbps(size, measurement.download_elapsed)
        );
    }

    println!("✅ Each run reported its own throughput");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_sessions() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("🔄 Running sessions in parallel");

    let host = HostSession::new(SpeedTestConfig {
        payload_mb: 1,
        max_payload_mb: 4,
        ..Default::default()
    })?;

    let sizes = [64 * 1024usize, 512 * 1024, 2 * 1024 * 1024];
    let mut handles = Vec::new();
    for size in sizes {
        let host = host.clone();
        handles.push(tokio::spawn(async move { host.run_bytes(size).await }));
    }

    for (handle, size) in handles.into_iter().zip(sizes) {
        let report = handle.await??;
        println!("  {} bytes → {} Mbps down, {} Mbps up", size, report.download, report.upload);
        assert_eq!(report.payload_bytes, size);
        assert!(report.debug_logs[2].contains(&format!(" {} bytes ", size)));
    }

    println!("✅ Parallel sessions did not interfere");
    Ok(())
}
