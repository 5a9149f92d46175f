//! Operations delegated to the numeric back ends: FFT, curve fitting and splines.

use ndarray::Array1;
use num_complex::Complex64;

use crate::math::fft::FftHelper;
use crate::math::fit::CurveFitter;
use crate::math::spline::CubicSpline;
use crate::prelude::{ScanError, ScanResult};
use crate::scan::LineScan;

/// Highest spline refinement accepted by `fit_spline`.
const MAX_SPLINE_DEGREE: u32 = 4;

impl LineScan {
    /// Discrete Fourier transform of the samples and the matching sample frequencies.
    pub fn forward_transform(&self) -> (Vec<Complex64>, Vec<f64>) {
        let spectrum = FftHelper::new(self.len()).forward(&self.to_vec());
        (spectrum, FftHelper::frequencies(self.len()))
    }

    /// Real part of the inverse transform of `spectrum`, carrying this scan's metadata.
    pub fn inverse_transform(&self, spectrum: &[Complex64]) -> ScanResult<LineScan> {
        if spectrum.len() != self.len() {
            return Err(ScanError::Shape(format!(
                "spectrum has {} bins, scan has {} samples",
                spectrum.len(),
                self.len()
            )));
        }
        let restored = FftHelper::new(spectrum.len()).inverse(spectrum);
        self.derive(restored.iter().map(|value| value.re).collect())
    }

    /// Least-squares parameters of `model(x, params)` over `x = 0..N-1`.
    ///
    /// `initial_guess` also fixes the number of parameters.
    pub fn get_model_params<F>(&self, model: F, initial_guess: &[f64]) -> ScanResult<Vec<f64>>
    where
        F: Fn(f64, &[f64]) -> f64,
    {
        let xs = Array1::from_shape_fn(self.len(), |i| i as f64);
        let report = CurveFitter::new().fit(&model, xs.view(), self.samples(), initial_guess)?;
        Ok(report.params)
    }

    /// A scan holding the fitted model evaluated at every sample index.
    pub fn fit_to_model<F>(&self, model: F, initial_guess: &[f64]) -> ScanResult<LineScan>
    where
        F: Fn(f64, &[f64]) -> f64,
    {
        let params = self.get_model_params(&model, initial_guess)?;
        let fitted = Array1::from_shape_fn(self.len(), |i| model(i as f64, &params));
        self.derive(fitted)
    }

    /// Cubic spline through the samples, evaluated every `0.1^degree` samples
    /// on `[0, N-1)`. Degrees above 4 are clipped to 4.
    pub fn fit_spline(&self, degree: u32) -> ScanResult<Vec<f64>> {
        if degree < 1 {
            return Err(ScanError::OutOfRange("spline degree must be at least 1".into()));
        }
        let degree = degree.min(MAX_SPLINE_DEGREE);
        let spline = CubicSpline::fit(self.samples())?;
        let step = 0.1f64.powi(degree as i32);
        Ok(spline.evaluate_grid(step, (self.len() - 1) as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Channel;

    #[test]
    fn transform_round_trip_keeps_metadata() {
        let scan = LineScan::builder([1.0, 4.0, 2.0, 8.0])
            .channel(Channel::Green)
            .build()
            .unwrap();
        let (spectrum, freqs) = scan.forward_transform();
        assert_eq!(freqs, vec![0.0, 0.25, -0.5, -0.25]);
        assert!((spectrum[0].re - 15.0).abs() < 1e-12);

        let restored = scan.inverse_transform(&spectrum).unwrap();
        assert_eq!(restored.channel(), Channel::Green);
        for (a, b) in restored.iter().zip(scan.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn inverse_transform_checks_length() {
        let scan = LineScan::new([1.0, 2.0]);
        let err = scan.inverse_transform(&[Complex64::new(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, ScanError::Shape(_)));
    }

    #[test]
    fn quadratic_model_fits_parabola() {
        let scan: LineScan = (0..12).map(|i| {
            let x = i as f64;
            0.5 * x * x - 3.0 * x + 2.0
        })
        .collect();
        let parabola = |x: f64, p: &[f64]| p[0] * x * x + p[1] * x + p[2];
        let params = scan.get_model_params(parabola, &[1.0, 1.0, 1.0]).unwrap();
        assert!((params[0] - 0.5).abs() < 1e-6);
        assert!((params[1] + 3.0).abs() < 1e-6);
        assert!((params[2] - 2.0).abs() < 1e-6);

        let fitted = scan.fit_to_model(parabola, &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(fitted.len(), scan.len());
        assert!(fitted.iter().zip(scan.iter()).all(|(a, b)| (a - b).abs() < 1e-5));
    }

    #[test]
    fn spline_degree_controls_resolution() {
        let scan = LineScan::new([0.0, 2.0, 1.0, 3.0]);
        assert_eq!(scan.fit_spline(1).unwrap().len(), 30);
        assert_eq!(scan.fit_spline(9).unwrap().len(), scan.fit_spline(4).unwrap().len());
        assert!(matches!(scan.fit_spline(0), Err(ScanError::OutOfRange(_))));
    }
}
