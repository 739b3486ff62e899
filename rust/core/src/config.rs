//! Host configuration

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Smallest payload a host may request, in MiB
pub const MIN_PAYLOAD_MB: u64 = 1;
/// Largest payload a host may request, in MiB
pub const MAX_PAYLOAD_MB: u64 = 100;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "speedsim.toml";

/// Speed test host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTestConfig {
    /// Payload size in MiB, default 10
    #[serde(default = "default_payload_mb")]
    pub payload_mb: u64,

    /// Allocation cap in MiB, default 100
    #[serde(default = "default_max_payload_mb")]
    pub max_payload_mb: u64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fixed PRNG seed for reproducible payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_payload_mb() -> u64 {
    10
}

fn default_max_payload_mb() -> u64 {
    MAX_PAYLOAD_MB
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        Self {
            payload_mb: default_payload_mb(),
            max_payload_mb: default_max_payload_mb(),
            log_level: default_log_level(),
            seed: None,
        }
    }
}

impl SpeedTestConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: SpeedTestConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check payload bounds
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PAYLOAD_MB..=MAX_PAYLOAD_MB).contains(&self.payload_mb) {
            bail!(
                "payload_mb must be between {} and {}, got {}",
                MIN_PAYLOAD_MB,
                MAX_PAYLOAD_MB,
                self.payload_mb
            );
        }
        if self.max_payload_mb > MAX_PAYLOAD_MB {
            bail!(
                "max_payload_mb must be at most {}, got {}",
                MAX_PAYLOAD_MB,
                self.max_payload_mb
            );
        }
        if self.max_payload_mb < self.payload_mb {
            bail!(
                "max_payload_mb ({}) is smaller than payload_mb ({})",
                self.max_payload_mb,
                self.payload_mb
            );
        }
        Ok(())
    }

    /// Payload size in bytes
    pub fn payload_bytes(&self) -> usize {
        (self.payload_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Allocation cap in bytes
    pub fn max_payload_bytes(&self) -> usize {
        (self.max_payload_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Look for a config file in the usual places
    pub fn find_config_file() -> Option<PathBuf> {
        let current_dir = Path::new(CONFIG_FILE_NAME);
        if current_dir.exists() {
            info!("Using config file: {}", current_dir.display());
            return Some(current_dir.to_path_buf());
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("speedsim").join("config.toml");
            if user_config.exists() {
                info!("Using user config file: {}", user_config.display());
                return Some(user_config);
            }
        }

        None
    }
}
