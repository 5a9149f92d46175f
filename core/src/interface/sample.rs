use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::prelude::{ScanResult, SourceHandle};
use crate::scan::{Channel, LineScan, Point, ScanMetadata};

/// Payload handed over by whatever sampled the intensity profile out of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSample {
    pub samples: Vec<f64>,
    /// Left empty when the sampler has no spatial information.
    #[serde(default)]
    pub coordinates: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<(Point, Point)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    #[serde(default)]
    pub channel: Channel,
}

impl LineSample {
    pub fn from_json(payload: &str) -> ScanResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> ScanResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Source of line samples, typically backed by an image.
pub trait ImageSampler {
    fn sample_line(&self, a: Point, b: Point, channel: Channel) -> ScanResult<LineSample>;

    /// Handle stored on every scan produced from this sampler.
    fn source(&self) -> Option<SourceHandle> {
        None
    }
}

impl LineScan {
    pub fn from_sample(sample: LineSample, source: Option<SourceHandle>) -> ScanResult<Self> {
        let mut meta = ScanMetadata::identity(sample.samples.len());
        if !sample.coordinates.is_empty() {
            meta.coordinates = sample.coordinates.into();
        }
        meta.source = source;
        meta.endpoints = sample.endpoints;
        meta.row = sample.row;
        meta.col = sample.col;
        meta.channel = sample.channel;
        LineScan::from_parts(Array1::from(sample.samples), meta)
    }

    /// Samples the line `a -> b` and wraps the result with the sampler's source handle.
    pub fn sample_from<S: ImageSampler + ?Sized>(
        sampler: &S,
        a: Point,
        b: Point,
        channel: Channel,
    ) -> ScanResult<Self> {
        let sample = sampler.sample_line(a, b, channel)?;
        Self::from_sample(sample, sampler.source())
    }
}
