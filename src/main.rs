//! Speed Sim - Payload Sweep
//!
//! Runs the simulated download at several payload sizes and compares the
//! resulting fill rates.

use speed_sim::sweep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    sweep::run_payload_sweep(&sweep::DEFAULT_SIZES).await
}
