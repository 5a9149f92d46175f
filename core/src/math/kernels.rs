//! Weight windows and the length-preserving convolution used by the smoothing filters.

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1};

/// Width `2 * degree - 1` of the smoothing window; `None` for degree 0 or on overflow.
pub fn smoothing_window(degree: usize) -> Option<usize> {
    degree.checked_mul(2).and_then(|w| w.checked_sub(1))
}

/// Normalized weights of the `2 * degree - 1` wide smoothing window.
///
/// Offset `k` from the centre gets `exp(-(4k / window)^2)`. A degree without a
/// valid window gives no weights.
pub fn gaussian_smoothing_weights(degree: usize) -> Array1<f64> {
    let window = smoothing_window(degree).unwrap_or(0);
    let weights = Array1::from_shape_fn(window, |i| {
        let offset = i as f64 - degree as f64 + 1.0;
        let frac = offset / window as f64;
        (-(4.0 * frac).powi(2)).exp()
    });
    let total = weights.sum();
    weights / total
}

/// `diameter` copies of `1 / diameter`.
pub fn uniform_kernel(diameter: usize) -> Array1<f64> {
    Array1::from_elem(diameter, 1.0 / diameter as f64)
}

/// Sampled normal density with `sigma = (diameter / 2) / 3` over offsets `-r..=r`.
///
/// The weights are not renormalized, so they only sum to ~1 for wide kernels.
pub fn gaussian_kernel(diameter: usize) -> Array1<f64> {
    let radius = diameter as f64 / 2.0;
    let sigma = radius / 3.0;
    let half = diameter / 2;
    Array1::from_shape_fn(2 * half + 1, |i| {
        let offset = i as f64 - half as f64;
        (-offset.powi(2) / (2.0 * sigma.powi(2))).exp() / ((2.0 * PI).sqrt() * sigma)
    })
}

/// Discrete convolution cropped to the input length, centred on the kernel.
///
/// Samples outside the input are treated as zero.
pub fn convolve_same(signal: ArrayView1<f64>, kernel: ArrayView1<f64>) -> Array1<f64> {
    let n = signal.len();
    let m = kernel.len();
    let offset = (m.saturating_sub(1) / 2) as isize;
    Array1::from_shape_fn(n, |i| {
        let full_index = i as isize + offset;
        (0..m)
            .filter_map(|k| {
                let j = full_index - k as isize;
                (j >= 0 && (j as usize) < n).then(|| signal[j as usize] * kernel[k])
            })
            .sum()
    })
}
