// Argument parsing and config resolution live here so they can be tested
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use speed_sim_core::SpeedTestConfig;
use std::path::PathBuf;

/// Simulated network speed test
#[derive(Parser, Debug, PartialEq)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand
    #[clap(subcommand)]
    pub command: Command,

    /// Config file path
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[clap(short, long)]
    pub log_level: Option<String>,

    /// Enable debug logging (same as --log-level=debug)
    #[clap(short, long)]
    pub verbose: bool,
}

/// Commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run a full session: download simulation plus host-timed upload
    Run {
        /// Payload size in MiB (1-100)
        #[clap(long)]
        size_mb: Option<u64>,

        /// Payload size in bytes, bypassing the MiB bounds
        #[clap(long, conflicts_with = "size_mb")]
        bytes: Option<usize>,

        /// Print the report as JSON
        #[clap(long)]
        json: bool,
    },

    /// Run only the routine and print the record it returns
    Measure {
        /// Buffer size in bytes
        #[clap(long, default_value = "1048576")]
        bytes: usize,
    },

    /// Write a default config file
    Init {
        /// Output path
        #[clap(default_value = "speedsim.toml")]
        path: PathBuf,
    },
}

/// Load the config named on the command line, a discovered one, or defaults
pub fn load_config(cli: &Cli) -> Result<SpeedTestConfig> {
    if let Some(config_path) = &cli.config {
        SpeedTestConfig::from_file(config_path)
    } else if let Some(config_path) = SpeedTestConfig::find_config_file() {
        SpeedTestConfig::from_file(config_path)
    } else {
        Ok(SpeedTestConfig::default())
    }
}

/// Resolve the log level: --verbose, then --log-level, then the config
pub fn effective_log_level(cli: &Cli, config: &SpeedTestConfig) -> String {
    if cli.verbose {
        "debug".to_string()
    } else if let Some(level) = &cli.log_level {
        level.clone()
    } else {
        config.log_level.clone()
    }
}

/// Apply a --size-mb override and re-validate
pub fn apply_size_override(mut config: SpeedTestConfig, size_mb: Option<u64>) -> Result<SpeedTestConfig> {
    if let Some(size_mb) = size_mb {
        config.payload_mb = size_mb;
        if config.max_payload_mb < size_mb {
            config.max_payload_mb = size_mb;
        }
    }
    config.validate().context("Invalid payload size")?;
    Ok(config)
}
