use nalgebra::DVector;
use ndarray::{Array1, ArrayView1};

use crate::math::matrix::MatrixHelper;
use crate::prelude::{ScanError, ScanResult};

/// Natural cubic interpolating spline through `(i, values[i])`.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    values: Array1<f64>,
    curvature: Array1<f64>,
}

impl CubicSpline {
    pub fn fit(values: ArrayView1<f64>) -> ScanResult<Self> {
        let n = values.len();
        if n < 2 {
            return Err(ScanError::OutOfRange(format!(
                "spline needs at least 2 samples, got {}",
                n
            )));
        }

        let mut curvature = Array1::<f64>::zeros(n);
        if n > 2 {
            let inner = n - 2;
            let rhs = DVector::from_fn(inner, |i, _| {
                6.0 * (values[i + 2] - 2.0 * values[i + 1] + values[i])
            });
            let system = MatrixHelper::tridiagonal(inner, 1.0, 4.0, 1.0);
            let solved = MatrixHelper::solve(system, &rhs, "spline curvature system")?;
            for (i, &m) in solved.iter().enumerate() {
                curvature[i + 1] = m;
            }
        }

        Ok(Self {
            values: values.to_owned(),
            curvature,
        })
    }

    /// Spline value at `x`; outside `[0, n-1]` the end segments are extrapolated.
    pub fn evaluate(&self, x: f64) -> f64 {
        let last_segment = self.values.len() - 2;
        let k = (x.floor().max(0.0) as usize).min(last_segment);
        let t = x - k as f64;
        let u = 1.0 - t;
        u * self.values[k]
            + t * self.values[k + 1]
            + ((u.powi(3) - u) * self.curvature[k] + (t.powi(3) - t) * self.curvature[k + 1]) / 6.0
    }

    /// Evaluates on `0, step, 2·step, …` strictly below `end`.
    pub fn evaluate_grid(&self, step: f64, end: f64) -> Vec<f64> {
        let count = (end / step).ceil().max(0.0) as usize;
        (0..count)
            .map(|i| i as f64 * step)
            .filter(|&x| x < end)
            .map(|x| self.evaluate(x))
            .collect()
    }
}
