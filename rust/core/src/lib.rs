//! Speed Sim - Core Module
//!
//! This crate provides the simulated speed test routine: an in-memory
//! "download" that fills a random buffer and reports the fill rate, plus
//! the host session that times the returned record as the "upload".

pub mod allocator;
pub mod config;
pub mod debug_log;
pub mod error;
pub mod host;
pub mod measurement;
pub mod metrics;
pub mod payload;
pub mod report;

pub use allocator::*;
pub use config::SpeedTestConfig;
pub use debug_log::DebugLog;
pub use error::*;
pub use host::{HostSession, SessionReport};
pub use measurement::{measure, SpeedTest};
pub use report::*;

/// Re-export common types
pub mod prelude {
    pub use crate::{
        allocator::{BufferAllocator, CappedAllocator, SystemAllocator},
        config::SpeedTestConfig,
        error::{Result, SpeedSimError},
        host::{HostSession, SessionReport},
        measurement::{measure, SpeedTest},
        report::{ErrorResult, Measurement, MeasurementResult, Outcome},
    };
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
