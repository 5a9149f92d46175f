use log::{debug, warn};
use ndarray::{s, Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::math::kernels::{
    convolve_same, gaussian_kernel, gaussian_smoothing_weights, smoothing_window, uniform_kernel,
};
use crate::math::stats::StatsHelper;
use crate::prelude::{ScanError, ScanResult};
use crate::scan::LineScan;

/// Weighting used by [`LineScan::running_average`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    #[default]
    Uniform,
    Gaussian,
}

impl LineScan {
    /// Gaussian-weighted smoothing over a `2 * degree - 1` wide window.
    ///
    /// The first `degree - 1` and the last `degree` samples are passed through
    /// unchanged. Scans no longer than the window come back unmodified.
    pub fn smooth(&self, degree: usize) -> ScanResult<LineScan> {
        let window = smoothing_window(degree).ok_or_else(|| {
            ScanError::OutOfRange(format!(
                "smoothing degree must be in 1..={}, got {}",
                usize::MAX / 2,
                degree
            ))
        })?;
        let samples = self.samples();
        let mut smoothed = samples.to_owned();
        if self.len() > window {
            let weights = gaussian_smoothing_weights(degree);
            for start in 0..self.len() - window {
                smoothed[start + degree - 1] = samples.slice(s![start..start + window]).dot(&weights);
            }
        }
        self.derive(smoothed)
    }

    /// Running average through [`convolve`](Self::convolve), truncated to whole numbers.
    pub fn running_average(&self, diameter: usize, kernel: KernelKind) -> ScanResult<LineScan> {
        if diameter % 2 == 0 {
            return Err(ScanError::OutOfRange(format!(
                "running average diameter must be odd, got {}",
                diameter
            )));
        }
        let weights = match kernel {
            KernelKind::Uniform => uniform_kernel(diameter),
            KernelKind::Gaussian => gaussian_kernel(diameter),
        };
        let averaged = self.convolve(weights.view())?;
        self.derive(averaged.samples().mapv(f64::trunc))
    }

    /// Convolves with an arbitrary kernel; the output keeps the input length.
    pub fn convolve(&self, kernel: ArrayView1<f64>) -> ScanResult<LineScan> {
        if kernel.is_empty() {
            return Err(ScanError::OutOfRange("convolution kernel is empty".into()));
        }
        self.derive(convolve_same(self.samples(), kernel))
    }

    /// Sliding median over a centred window of `size` samples.
    ///
    /// An even `size` is widened by one. The first and last `size / 2`
    /// samples are passed through unchanged.
    pub fn median(&self, size: usize) -> ScanResult<LineScan> {
        let size = if size % 2 == 0 {
            debug!("median window {} widened to {}", size, size + 1);
            size + 1
        } else {
            size
        };
        let skip = size / 2;
        let samples = self.samples();
        let mut filtered = samples.to_owned();
        if self.len() > 2 * skip {
            for i in skip..self.len() - skip {
                if let Some(median) = StatsHelper::median(samples.slice(s![i - skip..=i + skip])) {
                    filtered[i] = median;
                }
            }
        }
        self.derive(filtered)
    }

    /// Median filter over every sample, treating samples beyond either end as zero.
    ///
    /// An even `kernel_size` is narrowed by one.
    pub fn median_filter(&self, kernel_size: usize) -> ScanResult<LineScan> {
        if kernel_size == 0 {
            return Err(ScanError::OutOfRange("median filter kernel size must be at least 1".into()));
        }
        let kernel_size = if kernel_size % 2 == 0 {
            warn!("median filter kernel size {} should be odd, using {}", kernel_size, kernel_size - 1);
            kernel_size - 1
        } else {
            kernel_size
        };
        let half = (kernel_size / 2) as isize;
        let samples = self.samples();
        let n = self.len() as isize;
        let filtered = Array1::from_shape_fn(self.len(), |i| {
            let centre = i as isize;
            let window: Array1<f64> = (centre - half..=centre + half)
                .map(|j| if (0..n).contains(&j) { samples[j as usize] } else { 0.0 })
                .collect();
            StatsHelper::median(window.view()).unwrap_or(samples[i])
        });
        self.derive(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn smooth_passes_boundaries_through() {
        let scan = LineScan::new([0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0]);
        let smoothed = scan.smooth(2).unwrap();
        assert_eq!(smoothed.len(), scan.len());
        assert_eq!(smoothed[0], 0.0);
        assert_eq!(&smoothed.to_vec()[6..], &[0.0, 0.0]);
        assert!(smoothed[3] < 10.0 && smoothed[2] > 0.0 && smoothed[4] > 0.0);
    }

    #[test]
    fn smooth_of_constant_is_constant() {
        let scan = LineScan::new([4.0; 12]);
        let smoothed = scan.smooth(3).unwrap();
        assert!(smoothed.iter().all(|v| (v - 4.0).abs() < 1e-12));
    }

    #[test]
    fn smooth_short_scan_is_unchanged() {
        let scan = LineScan::new([1.0, 9.0, 1.0]);
        assert_eq!(scan.smooth(3).unwrap(), scan);
        assert!(scan.smooth(0).is_err());
    }

    #[test]
    fn smooth_rejects_degree_without_window() {
        let scan = LineScan::new([1.0, 9.0, 1.0]);
        assert!(matches!(scan.smooth(usize::MAX / 2 + 1), Err(ScanError::OutOfRange(_))));
        assert_eq!(scan.smooth(usize::MAX / 2).unwrap(), scan);
    }

    #[test]
    fn running_average_rejects_even_diameter() {
        let scan = LineScan::new([1.0, 2.0, 3.0]);
        assert!(matches!(
            scan.running_average(4, KernelKind::Uniform),
            Err(ScanError::OutOfRange(_))
        ));
    }

    #[test]
    fn uniform_running_average_truncates() {
        let scan = LineScan::new([3.0, 3.0, 4.0, 3.0, 3.0]);
        let averaged = scan.running_average(3, KernelKind::Uniform).unwrap();
        assert_eq!(averaged.to_vec(), vec![2.0, 3.0, 3.0, 3.0, 2.0]);
    }

    #[test]
    fn gaussian_running_average_keeps_length() {
        let scan = LineScan::new([10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]);
        let averaged = scan.running_average(5, KernelKind::Gaussian).unwrap();
        assert_eq!(averaged.len(), 7);
        assert!(averaged.iter().all(|v| v.fract() == 0.0));
    }

    #[test]
    fn convolve_rejects_empty_kernel() {
        let scan = LineScan::new([1.0, 2.0]);
        assert!(scan.convolve(Array1::<f64>::zeros(0).view()).is_err());
        assert_eq!(scan.convolve(array![1.0].view()).unwrap(), scan);
    }

    #[test]
    fn median_removes_spike_and_keeps_edges() {
        let scan = LineScan::new([9.0, 1.0, 1.0, 50.0, 1.0, 1.0, 9.0]);
        let filtered = scan.median(4).unwrap();
        assert_eq!(filtered.to_vec(), vec![9.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.0]);
    }

    #[test]
    fn median_filter_pads_with_zeros() {
        let scan = LineScan::new([5.0, 5.0, 5.0, 5.0]);
        let filtered = scan.median_filter(3).unwrap();
        assert_eq!(filtered.to_vec(), vec![5.0, 5.0, 5.0, 5.0]);
        let filtered = scan.median_filter(6).unwrap();
        assert_eq!(filtered.to_vec(), vec![5.0, 5.0, 5.0, 5.0]);
        assert!(scan.median_filter(0).is_err());
    }
}
