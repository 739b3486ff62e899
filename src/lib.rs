//! Speed Sim
//!
//! Simulated speed test: an in-memory "download" measured by the routine and
//! an "upload" measured by the host while it receives the routine's record.

pub use speed_sim_core::*;

pub mod sweep;
