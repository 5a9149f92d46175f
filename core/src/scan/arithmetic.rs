use std::ops::{Add, Div, Mul, Sub};

use super::LineScan;
use crate::prelude::{ScanError, ScanResult};

impl LineScan {
    fn check_same_length(&self, other: &LineScan, op: &str) -> ScanResult<()> {
        if self.len() != other.len() {
            return Err(ScanError::Shape(format!(
                "cannot {} scans of length {} and {}",
                op,
                self.len(),
                other.len()
            )));
        }
        Ok(())
    }

    /// Elementwise sum; metadata comes from `self`.
    pub fn add(&self, other: &LineScan) -> ScanResult<LineScan> {
        self.check_same_length(other, "add")?;
        self.derive(&self.samples + &other.samples)
    }

    pub fn sub(&self, other: &LineScan) -> ScanResult<LineScan> {
        self.check_same_length(other, "subtract")?;
        self.derive(&self.samples - &other.samples)
    }

    pub fn mul(&self, other: &LineScan) -> ScanResult<LineScan> {
        self.check_same_length(other, "multiply")?;
        self.derive(&self.samples * &other.samples)
    }

    /// Elementwise quotient. Any exact zero in `other` is an error.
    pub fn div(&self, other: &LineScan) -> ScanResult<LineScan> {
        self.check_same_length(other, "divide")?;
        if let Some(index) = other.samples.iter().position(|&v| v == 0.0) {
            return Err(ScanError::DivideByZero(format!(
                "divisor scan holds zero at index {}",
                index
            )));
        }
        self.derive(&self.samples / &other.samples)
    }
}

macro_rules! scan_operator {
    ($trait:ident, $method:ident) => {
        impl $trait<&LineScan> for &LineScan {
            type Output = ScanResult<LineScan>;

            fn $method(self, rhs: &LineScan) -> Self::Output {
                LineScan::$method(self, rhs)
            }
        }
    };
}

scan_operator!(Add, add);
scan_operator!(Sub, sub);
scan_operator!(Mul, mul);
scan_operator!(Div, div);
