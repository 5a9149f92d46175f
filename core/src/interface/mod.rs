pub mod sample;

pub use sample::{ImageSampler, LineSample};
