pub mod fft;
pub mod fit;
pub mod kernels;
pub mod matrix;
pub mod spline;
pub mod stats;

pub use fft::FftHelper;
pub use fit::{CurveFitter, FitReport};
pub use matrix::MatrixHelper;
pub use spline::CubicSpline;
pub use stats::StatsHelper;
