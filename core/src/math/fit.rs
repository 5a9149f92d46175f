//! Damped least-squares (Levenberg–Marquardt) fitting of a parametric model.

use log::trace;
use nalgebra::{DMatrix, DVector};
use ndarray::ArrayView1;

use crate::math::matrix::MatrixHelper;
use crate::prelude::{ScanError, ScanResult};

/// Outcome of a successful fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub params: Vec<f64>,
    /// Sum of squared residuals at `params`.
    pub cost: f64,
    pub iterations: usize,
}

/// Fits `model(x, params)` to `(x, y)` samples by minimizing squared error.
#[derive(Debug, Clone)]
pub struct CurveFitter {
    max_iterations: usize,
    tolerance: f64,
}

impl Default for CurveFitter {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            tolerance: 1e-10,
        }
    }
}

impl CurveFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn fit<F>(
        &self,
        model: &F,
        xs: ArrayView1<f64>,
        ys: ArrayView1<f64>,
        initial_guess: &[f64],
    ) -> ScanResult<FitReport>
    where
        F: Fn(f64, &[f64]) -> f64,
    {
        if initial_guess.is_empty() {
            return Err(ScanError::OutOfRange(
                "curve fit needs at least one parameter in the initial guess".into(),
            ));
        }
        if xs.len() != ys.len() {
            return Err(ScanError::Shape(format!(
                "{} abscissae for {} observations",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < initial_guess.len() {
            return Err(ScanError::ModelFit(format!(
                "{} observations cannot determine {} parameters",
                xs.len(),
                initial_guess.len()
            )));
        }

        let mut params = initial_guess.to_vec();
        let mut residuals = residual_vector(model, xs, ys, &params).ok_or_else(|| {
            ScanError::ModelFit("model is not finite at the initial guess".into())
        })?;
        let mut cost = residuals.norm_squared();
        let mut damping = 1e-3;

        for iteration in 0..self.max_iterations {
            if cost <= f64::EPSILON {
                return Ok(self.report(params, cost, iteration));
            }

            let jacobian = forward_jacobian(model, xs, &params).ok_or_else(|| {
                ScanError::ModelFit(format!("model jacobian not finite at {:?}", params))
            })?;
            let jt = jacobian.transpose();
            let normal = &jt * &jacobian;
            let gradient = &jt * &residuals;
            if gradient.iter().all(|g| g.abs() <= self.tolerance) {
                return Ok(self.report(params, cost, iteration));
            }

            loop {
                let mut damped = normal.clone();
                for j in 0..params.len() {
                    damped[(j, j)] += damping * normal[(j, j)].max(1e-12);
                }

                let step = MatrixHelper::solve(damped, &gradient, "damped normal equations")?;
                let next: Vec<f64> = params.iter().zip(step.iter()).map(|(p, s)| p + s).collect();
                let candidate = residual_vector(model, xs, ys, &next);

                match candidate {
                    Some(next_residuals) if next_residuals.norm_squared() < cost => {
                        let next_cost = next_residuals.norm_squared();
                        let param_norm: f64 = next.iter().map(|p| p * p).sum::<f64>().sqrt();
                        let improvement = cost - next_cost;

                        params = next;
                        residuals = next_residuals;
                        cost = next_cost;
                        damping = (damping / 10.0).max(1e-12);

                        if improvement <= self.tolerance * cost
                            || step.norm() <= self.tolerance * (param_norm + self.tolerance)
                        {
                            return Ok(self.report(params, cost, iteration + 1));
                        }
                        break;
                    }
                    _ => {
                        damping *= 10.0;
                        if damping > 1e16 {
                            // no downhill step left: the current point is a minimum
                            return Ok(self.report(params, cost, iteration + 1));
                        }
                    }
                }
            }
        }

        Err(ScanError::ModelFit(format!(
            "no convergence after {} iterations (cost {:.6e})",
            self.max_iterations, cost
        )))
    }

    fn report(&self, params: Vec<f64>, cost: f64, iterations: usize) -> FitReport {
        trace!("curve fit converged after {} iterations, cost {:.6e}", iterations, cost);
        FitReport {
            params,
            cost,
            iterations,
        }
    }
}

fn residual_vector<F>(model: &F, xs: ArrayView1<f64>, ys: ArrayView1<f64>, params: &[f64]) -> Option<DVector<f64>>
where
    F: Fn(f64, &[f64]) -> f64,
{
    let out = DVector::from_fn(xs.len(), |i, _| ys[i] - model(xs[i], params));
    out.iter().all(|r| r.is_finite()).then_some(out)
}

fn forward_jacobian<F>(model: &F, xs: ArrayView1<f64>, params: &[f64]) -> Option<DMatrix<f64>>
where
    F: Fn(f64, &[f64]) -> f64,
{
    let mut jac = DMatrix::<f64>::zeros(xs.len(), params.len());
    let mut shifted = params.to_vec();
    for j in 0..params.len() {
        let h = f64::EPSILON.sqrt() * params[j].abs().max(1.0);
        shifted[j] = params[j] + h;
        for (i, &x) in xs.iter().enumerate() {
            jac[(i, j)] = (model(x, &shifted) - model(x, params)) / h;
        }
        shifted[j] = params[j];
    }
    jac.iter().all(|v| v.is_finite()).then_some(jac)
}
