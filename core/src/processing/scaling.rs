use std::sync::Arc;

use ndarray::Array1;

use crate::math::fft::FftHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{ScanError, ScanResult};
use crate::scan::{LineScan, Point};

impl LineScan {
    /// Divides every sample by the maximum sample.
    pub fn normalize(&self) -> ScanResult<LineScan> {
        let (_, max) = StatsHelper::min_max(self.samples())
            .ok_or_else(|| ScanError::DivideByZero("cannot normalize an empty scan".into()))?;
        if max == 0.0 {
            return Err(ScanError::DivideByZero("scan maximum is zero".into()));
        }
        self.derive(self.samples().mapv(|v| v / max))
    }

    /// Affine remap of `[min, max]` of the samples onto `[min(range), max(range)]`.
    pub fn scale(&self, range: (f64, f64)) -> ScanResult<LineScan> {
        let (low, high) = if range.0 <= range.1 {
            range
        } else {
            (range.1, range.0)
        };
        let (vmin, vmax) = StatsHelper::min_max(self.samples())
            .ok_or_else(|| ScanError::DivideByZero("cannot scale an empty scan".into()))?;
        if vmax == vmin {
            return Err(ScanError::DivideByZero(format!(
                "scan is constant at {}, range is degenerate",
                vmax
            )));
        }
        let gain = (high - low) / (vmax - vmin);
        self.derive(self.samples().mapv(|v| {
            // exact upper bound
            if v == vmax {
                high
            } else {
                gain * (v - vmin) + low
            }
        }))
    }

    /// Backward difference; the first sample of the result is zero.
    pub fn derivative(&self) -> ScanResult<LineScan> {
        let samples = self.samples();
        let diff = Array1::from_shape_fn(self.len(), |i| {
            if i == 0 {
                0.0
            } else {
                samples[i] - samples[i - 1]
            }
        });
        self.derive(diff)
    }

    /// Removes the least-squares straight line through `(i, samples[i])`.
    pub fn detrend(&self) -> ScanResult<LineScan> {
        let n = self.len();
        if n < 2 {
            return self.derive(Array1::zeros(n));
        }
        let samples = self.samples();
        let x_mean = (n - 1) as f64 / 2.0;
        let y_mean = StatsHelper::mean(samples);
        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (i, &y) in samples.iter().enumerate() {
            let dx = i as f64 - x_mean;
            sxy += dx * (y - y_mean);
            sxx += dx * dx;
        }
        let slope = sxy / sxx;
        let detrended = Array1::from_shape_fn(n, |i| samples[i] - (y_mean + slope * (i as f64 - x_mean)));
        self.derive(detrended)
    }

    /// Fourier resampling to `count` samples.
    ///
    /// Coordinates are re-spaced evenly between the first and last input coordinate.
    pub fn resample(&self, count: usize) -> ScanResult<LineScan> {
        if count == 0 || self.is_empty() {
            return Err(ScanError::OutOfRange(format!(
                "cannot resample {} samples to {}",
                self.len(),
                count
            )));
        }
        let input = self.to_vec();
        let samples = Array1::from(FftHelper::resample(&input, count));

        let coordinates = self.coordinates();
        let (first, last) = (coordinates[0], coordinates[coordinates.len() - 1]);
        let spacing: Arc<[Point]> = (0..count)
            .map(|i| {
                let t = if count > 1 {
                    i as f64 / (count - 1) as f64
                } else {
                    0.0
                };
                (first.0 + t * (last.0 - first.0), first.1 + t * (last.1 - first.1))
            })
            .collect();
        self.derive_with_coordinates(samples, spacing)
    }
}
