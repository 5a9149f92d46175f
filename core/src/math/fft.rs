use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps a forward/inverse `rustfft` plan pair of one size.
pub struct FftHelper {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            forward,
            inverse,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real sequence, zero-padded or truncated to the plan size.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(self.size)
            .map(|&value| Complex64::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::zero());
        self.forward.process(&mut buffer);
        buffer
    }

    /// Inverse transform normalized by `1/N`, so `inverse(forward(x)) == x`.
    pub fn inverse(&self, spectrum: &[Complex64]) -> Vec<Complex64> {
        let mut buffer = spectrum[..spectrum.len().min(self.size)].to_vec();
        buffer.resize(self.size, Complex64::zero());
        self.inverse.process(&mut buffer);
        let scale = 1.0 / self.size.max(1) as f64;
        buffer.iter_mut().for_each(|value| *value *= scale);
        buffer
    }

    /// Sample frequencies (cycles per sample) of an `n`-point transform.
    pub fn frequencies(n: usize) -> Vec<f64> {
        let positive = (n as isize - 1) / 2 + 1;
        (0..n as isize)
            .map(|k| if k < positive { k } else { k - n as isize })
            .map(|k| k as f64 / n as f64)
            .collect()
    }

    /// Fourier-domain resampling of `input` to `num` samples.
    ///
    /// High frequencies are truncated when downsampling and zero-padded when
    /// upsampling; an even-length Nyquist bin is split or joined so the output
    /// stays real.
    pub fn resample(input: &[f64], num: usize) -> Vec<f64> {
        let nx = input.len();
        if nx == 0 || num == 0 {
            return Vec::new();
        }

        let spectrum = FftHelper::new(nx).forward(input);
        let n = num.min(nx);
        let nyquist = n / 2 + 1;

        let mut resized = vec![Complex64::zero(); num];
        resized[..nyquist].copy_from_slice(&spectrum[..nyquist]);
        if n > 2 {
            let tail = n - nyquist;
            resized[num - tail..].copy_from_slice(&spectrum[nx - tail..]);
        }
        if n % 2 == 0 {
            if num < nx {
                resized[num - n / 2] += spectrum[nx - n / 2];
            } else if nx < num {
                resized[n / 2] *= 0.5;
                resized[num - n / 2] = resized[n / 2];
            }
        }

        let scale = num as f64 / nx as f64;
        FftHelper::new(num)
            .inverse(&resized)
            .iter()
            .map(|value| value.re * scale)
            .collect()
    }
}
