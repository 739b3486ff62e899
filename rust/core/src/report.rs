//! Records handed back to the host

use crate::metrics::{format_fixed2, format_seconds};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Successful measurement as returned across the host boundary.
///
/// Numeric fields are pre-formatted with two decimals. `upload` and
/// `ul_time` are always `None` here; the host measures them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResult {
    pub download: String,
    pub upload: Option<String>,
    pub total_time: String,
    pub dl_time: String,
    pub ul_time: Option<String>,
    pub debug_logs: Vec<String>,
}

/// Failed measurement with the logs accumulated before the failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult {
    pub error: String,
    pub debug_logs: Vec<String>,
}

/// Either record. Serialized untagged so the wire form is the bare record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Success(MeasurementResult),
    Failure(ErrorResult),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn debug_logs(&self) -> &[String] {
        match self {
            Outcome::Success(result) => &result.debug_logs,
            Outcome::Failure(error) => &error.debug_logs,
        }
    }

    pub fn success(&self) -> Option<&MeasurementResult> {
        match self {
            Outcome::Success(result) => Some(result),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ErrorResult> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }
}

impl From<Result<Measurement, ErrorResult>> for Outcome {
    fn from(result: Result<Measurement, ErrorResult>) -> Self {
        match result {
            Ok(measurement) => Outcome::Success(measurement.into_result()),
            Err(error) => Outcome::Failure(error),
        }
    }
}

/// Typed form of a successful run, before display rounding
#[derive(Debug, Clone)]
pub struct Measurement {
    pub bytes: usize,
    pub download_elapsed: Duration,
    pub total_elapsed: Duration,
    pub download_mbps: f64,
    pub debug_logs: Vec<String>,
}

impl Measurement {
    pub fn to_result(&self) -> MeasurementResult {
        self.clone().into_result()
    }

    pub fn into_result(self) -> MeasurementResult {
        MeasurementResult {
            download: format_fixed2(self.download_mbps),
            upload: None,
            total_time: format_seconds(self.total_elapsed),
            dl_time: format_seconds(self.download_elapsed),
            ul_time: None,
            debug_logs: self.debug_logs,
        }
    }
}
