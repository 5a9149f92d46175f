use nalgebra::{DMatrix, DVector};

use crate::prelude::{ScanError, ScanResult};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Solves `system · x = rhs` through an LU decomposition.
    ///
    /// A singular system is reported as a fit failure naming `what`.
    pub fn solve(system: DMatrix<f64>, rhs: &DVector<f64>, what: &str) -> ScanResult<DVector<f64>> {
        if !system.is_square() || system.nrows() != rhs.len() {
            return Err(ScanError::Shape(format!(
                "{}: {}x{} system with {} right-hand values",
                what,
                system.nrows(),
                system.ncols(),
                rhs.len()
            )));
        }
        system
            .lu()
            .solve(rhs)
            .ok_or_else(|| ScanError::ModelFit(format!("{} is singular", what)))
    }

    /// Square matrix with constant sub-, main and super-diagonals.
    pub fn tridiagonal(n: usize, lower: f64, diag: f64, upper: f64) -> DMatrix<f64> {
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                diag
            } else if i == j + 1 {
                lower
            } else if j == i + 1 {
                upper
            } else {
                0.0
            }
        })
    }
}
