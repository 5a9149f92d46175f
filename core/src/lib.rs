//! Line-scan container and analysis toolkit.
//!
//! A [`LineScan`] is a one-dimensional intensity profile sampled along a line
//! in an image, paired with the image coordinate of every sample. Every
//! transformation returns a new scan that inherits the spatial metadata of its
//! input; nothing in this crate mutates a scan in place.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod scan;
pub mod telemetry;

pub use interface::{ImageSampler, LineSample};
pub use prelude::{DetectionConfig, ProcessingStage, ScanError, ScanResult};
pub use processing::{Extremum, Feature, KernelKind, Lut, LutSeed, Pipeline, StageConfig};
pub use scan::{Channel, LineScan, LineScanBuilder, Point, ScanMetadata, SourceHandle};
