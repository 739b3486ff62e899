use anyhow::{Context, Result};
use clap::Parser;
use speed_sim_cli::{apply_size_override, effective_log_level, load_config, Cli, Command};
use speed_sim_core::{HostSession, SpeedTest, SpeedTestConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let log_level = effective_log_level(&cli, &config);

    tracing_subscriber::fmt()
        .with_env_filter(log_level.as_str())
        .init();

    match &cli.command {
        Command::Run { size_mb, bytes, json } => {
            let config = apply_size_override(config, *size_mb)?;
            let host = HostSession::new(config)?;

            let result = match bytes {
                Some(bytes) => host.run_bytes(*bytes).await,
                None => host.run().await,
            };

            match result {
                Ok(report) => {
                    if *json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!("{}", report.render());
                    }
                }
                Err(e) => {
                    error!("Speed-test failed: {}", e);
                    for line in e.debug_logs() {
                        eprintln!("  {}", line);
                    }
                    return Err(e.into());
                }
            }
        }

        Command::Measure { bytes } => {
            let mut test = SpeedTest::new(*bytes);
            if let Some(seed) = config.seed {
                test = test.with_seed(seed);
            }
            let outcome = test.run_async().await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Init { path } => {
            SpeedTestConfig::default()
                .save_to_file(path)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote default config to {:?}", path);
            println!("Wrote default config file: {:?}", path);
        }
    }

    Ok(())
}
