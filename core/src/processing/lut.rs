//! 256-entry lookup tables and the point transforms built on them.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::prelude::{ScanError, ScanResult};
use crate::scan::LineScan;

pub const LUT_SIZE: usize = 256;

/// How a fresh [`Lut`] is filled.
///
/// `Range(a, b)` ramps linearly from `a` to `b`; `Scalar(0)` is all zeros, a
/// positive scalar fills the table with that value (at least 1) and any other
/// scalar gives the identity table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LutSeed {
    Range(f64, f64),
    Scalar(f64),
}

impl Default for LutSeed {
    fn default() -> Self {
        LutSeed::Scalar(-1.0)
    }
}

impl From<f64> for LutSeed {
    fn from(value: f64) -> Self {
        LutSeed::Scalar(value)
    }
}

impl From<(f64, f64)> for LutSeed {
    fn from((start, stop): (f64, f64)) -> Self {
        LutSeed::Range(start, stop)
    }
}

fn clip_u8(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Fixed mapping from an 8-bit index to an 8-bit output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    table: [u8; LUT_SIZE],
}

impl Default for Lut {
    fn default() -> Self {
        Self::identity()
    }
}

impl Lut {
    pub fn build(seed: impl Into<LutSeed>) -> Self {
        match seed.into() {
            LutSeed::Range(start, stop) => {
                let start = start.clamp(0.0, 255.0);
                let stop = stop.clamp(0.0, 255.0);
                let step = (stop - start) / (LUT_SIZE - 1) as f64;
                let mut table = [0u8; LUT_SIZE];
                for (i, entry) in table.iter_mut().enumerate() {
                    *entry = clip_u8((start + step * i as f64).round());
                }
                Self { table }
            }
            LutSeed::Scalar(value) if value == 0.0 => Self {
                table: [0; LUT_SIZE],
            },
            LutSeed::Scalar(value) if value > 0.0 => Self {
                table: [clip_u8(value.max(1.0)); LUT_SIZE],
            },
            LutSeed::Scalar(_) => Self::identity(),
        }
    }

    pub fn identity() -> Self {
        let mut table = [0u8; LUT_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        Self { table }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.table
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.table.get(index).copied()
    }

    /// Sets every in-range index to `value` (clipped to `[0, 255]`).
    ///
    /// Indices outside the table are skipped.
    pub fn fill<I: IntoIterator<Item = i64>>(&mut self, indices: I, value: f64) -> &mut Self {
        let value = clip_u8(value);
        for index in indices {
            if let Some(entry) = usize::try_from(index).ok().and_then(|i| self.table.get_mut(i)) {
                *entry = value;
            }
        }
        self
    }

    /// [`fill`](Self::fill) using the rounded samples of a scan as indices,
    /// e.g. to mark every intensity present in a reference swatch.
    pub fn fill_from_scan(&mut self, swatch: &LineScan, value: f64) -> &mut Self {
        let indices: Vec<i64> = swatch
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i64)
            .collect();
        self.fill(indices, value)
    }
}

impl LineScan {
    /// Replaces every sample `s` with `lut[s]`.
    ///
    /// Samples must be whole numbers inside the table.
    pub fn apply_lut(&self, lut: &Lut) -> ScanResult<LineScan> {
        let mapped = self
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let in_table = v.fract() == 0.0 && v >= 0.0 && v < LUT_SIZE as f64;
                if in_table {
                    Ok(f64::from(lut.table[v as usize]))
                } else {
                    Err(ScanError::OutOfRange(format!(
                        "sample {} at index {} is not a lookup table index",
                        v, i
                    )))
                }
            })
            .collect::<ScanResult<Vec<f64>>>()?;
        self.derive(Array1::from(mapped))
    }

    /// Binary point transform: below `cutoff` maps to 0, the rest to 255
    /// (swapped when `invert` is set).
    pub fn threshold(&self, cutoff: f64, invert: bool) -> ScanResult<LineScan> {
        let (low, high) = if invert { (255.0, 0.0) } else { (0.0, 255.0) };
        self.derive(self.samples().mapv(|v| if v < cutoff { low } else { high }))
    }

    /// `max - s` for every sample; 255 gives the usual 8-bit negative.
    pub fn invert(&self, max: f64) -> ScanResult<LineScan> {
        self.derive(self.samples().mapv(|v| max - v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_build_expected_tables() {
        assert_eq!(Lut::build(0.0).as_slice(), &[0u8; LUT_SIZE][..]);
        assert_eq!(Lut::build(300.0).get(17), Some(255));
        assert_eq!(Lut::build(0.4).get(17), Some(1));
        assert_eq!(Lut::build(-1.0), Lut::identity());

        let ramp = Lut::build((0.0, 255.0));
        assert_eq!(ramp, Lut::identity());
        let flat = Lut::build((400.0, 300.0));
        assert!(flat.as_slice().iter().all(|&v| v == 255));
    }

    #[test]
    fn fill_skips_out_of_range_indices() {
        let mut lut = Lut::build(0.0);
        lut.fill([-3, 4, 255, 256, 9000], 999.0);
        assert_eq!(lut.get(4), Some(255));
        assert_eq!(lut.get(255), Some(255));
        assert_eq!(lut.get(0), Some(0));
    }

    #[test]
    fn fill_from_scan_marks_swatch_values() {
        let swatch = LineScan::new([10.2, 20.0, -5.0]);
        let mut lut = Lut::build(0.0);
        lut.fill_from_scan(&swatch, 128.0);
        assert_eq!(lut.get(10), Some(128));
        assert_eq!(lut.get(20), Some(128));
        assert_eq!(lut.get(11), Some(0));
    }

    #[test]
    fn apply_maps_through_table() {
        let mut lut = Lut::identity();
        lut.fill([3], 200.0);
        let scan = LineScan::new([1u8, 3, 255]);
        assert_eq!(scan.apply_lut(&lut).unwrap().to_vec(), vec![1.0, 200.0, 255.0]);
    }

    #[test]
    fn apply_rejects_values_outside_table() {
        let lut = Lut::identity();
        assert!(matches!(
            LineScan::new([0.0, 256.0]).apply_lut(&lut),
            Err(ScanError::OutOfRange(_))
        ));
        assert!(LineScan::new([-1.0]).apply_lut(&lut).is_err());
        assert!(LineScan::new([2.5]).apply_lut(&lut).is_err());
    }

    #[test]
    fn threshold_and_its_inverse() {
        let scan = LineScan::new([10, 100, 200]);
        assert_eq!(scan.threshold(128.0, false).unwrap().to_vec(), vec![0.0, 0.0, 255.0]);
        assert_eq!(scan.threshold(128.0, true).unwrap().to_vec(), vec![255.0, 255.0, 0.0]);
    }

    #[test]
    fn invert_complements_samples() {
        let scan = LineScan::new([0, 55, 255]);
        assert_eq!(scan.invert(255.0).unwrap().to_vec(), vec![255.0, 200.0, 0.0]);
    }
}
