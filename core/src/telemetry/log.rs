use log::{debug, trace};

use crate::math::stats::StatsHelper;
use crate::scan::LineScan;

/// Formats and emits the per-stage log lines of a pipeline run.
pub struct ScanLogger {
    target: &'static str,
}

impl ScanLogger {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record_stage(&self, stage: &str, output: &LineScan) {
        match StatsHelper::min_max(output.samples()) {
            Some((min, max)) => debug!(
                target: self.target,
                "{} -> {} samples in [{:.3}, {:.3}]",
                stage,
                output.len(),
                min,
                max
            ),
            None => debug!(target: self.target, "{} -> {} samples", stage, output.len()),
        }
    }

    pub fn record_features(&self, kind: &str, count: usize) {
        trace!(target: self.target, "{} {} detected", count, kind);
    }
}

impl Default for ScanLogger {
    fn default() -> Self {
        Self::new("linescan")
    }
}
