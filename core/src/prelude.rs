use serde::{Deserialize, Serialize};

pub use crate::scan::{Channel, LineScan, LineScanBuilder, Point, ScanMetadata, SourceHandle};

/// Shared configuration for peak and valley detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub window: usize,
    pub delta: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window: 30,
            delta: 3.0,
        }
    }
}

/// Common error type for every line-scan operation.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("shape mismatch: {0}")]
    Shape(String),
    #[error("divide by zero: {0}")]
    DivideByZero(String),
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("model fit failed: {0}")]
    ModelFit(String),
    #[error("invalid sample payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Trait describing a single transformation applied by a [`Pipeline`](crate::processing::Pipeline).
pub trait ProcessingStage {
    fn name(&self) -> &'static str;
    fn execute(&self, input: &LineScan) -> ScanResult<LineScan>;
}
