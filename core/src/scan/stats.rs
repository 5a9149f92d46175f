use super::LineScan;
use crate::math::stats::StatsHelper;
use crate::prelude::{ScanError, ScanResult};

impl LineScan {
    fn require_samples(&self, what: &str) -> ScanResult<()> {
        if self.is_empty() {
            return Err(ScanError::DivideByZero(format!("{} of an empty scan", what)));
        }
        Ok(())
    }

    pub fn mean(&self) -> ScanResult<f64> {
        self.require_samples("mean")?;
        Ok(StatsHelper::mean(self.samples.view()))
    }

    /// Population variance (divides by N).
    pub fn variance(&self) -> ScanResult<f64> {
        self.require_samples("variance")?;
        Ok(StatsHelper::variance(self.samples.view()))
    }

    pub fn deviation(&self) -> ScanResult<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn find_first_index_equal(&self, value: f64) -> Option<usize> {
        self.samples.iter().position(|&v| v == value)
    }

    pub fn find_last_index_equal(&self, value: f64) -> Option<usize> {
        self.samples.iter().rposition(|&v| v == value)
    }

    /// First index whose sample is greater than or equal to `value`.
    pub fn find_first_index_greater(&self, value: f64) -> Option<usize> {
        self.samples.iter().position(|&v| v >= value)
    }
}
