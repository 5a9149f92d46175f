pub mod features;
pub mod lut;
pub mod model;
pub mod scaling;
pub mod smoothing;
pub mod stage;

pub use features::{Extremum, Feature};
pub use lut::{Lut, LutSeed, LUT_SIZE};
pub use smoothing::KernelKind;
pub use stage::{Pipeline, StageConfig};
