//! The [`LineScan`] container and its metadata propagation contract.

mod arithmetic;
mod stats;

use std::any::Any;
use std::fmt;
use std::ops::{Bound, Index, RangeBounds};
use std::sync::Arc;

use ndarray::{s, Array1, ArrayView1, Ix1};
use serde::{Deserialize, Serialize};

use crate::prelude::{ScanError, ScanResult};

/// Image-space location of a sample, as `(x, y)`.
pub type Point = (f64, f64);

/// Colour or intensity channel a scan was sampled from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    None,
    Gray,
    Red,
    Green,
    Blue,
}

/// Opaque back-reference to the image a scan was sampled from.
///
/// The handle is only ever cloned and compared; equality is pointer identity.
#[derive(Clone)]
pub struct SourceHandle(Arc<dyn Any + Send + Sync>);

impl SourceHandle {
    pub fn new<T: Any + Send + Sync>(source: T) -> Self {
        Self(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn Any + Send + Sync>) -> Self {
        Self(source)
    }

    /// Recovers the concrete source type for the caller that created it.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl PartialEq for SourceHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SourceHandle(..)")
    }
}

/// Everything a scan carries besides its sample values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMetadata {
    pub coordinates: Arc<[Point]>,
    pub source: Option<SourceHandle>,
    pub endpoints: Option<(Point, Point)>,
    pub row: Option<usize>,
    pub col: Option<usize>,
    pub channel: Channel,
}

impl ScanMetadata {
    /// Metadata for a scan with no provenance: coordinate `i` is `(i, i)`.
    pub fn identity(len: usize) -> Self {
        Self {
            coordinates: identity_coordinates(len),
            source: None,
            endpoints: None,
            row: None,
            col: None,
            channel: Channel::None,
        }
    }
}

fn identity_coordinates(len: usize) -> Arc<[Point]> {
    (0..len).map(|i| (i as f64, i as f64)).collect()
}

/// One-dimensional intensity profile plus the image coordinate of every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LineScan {
    samples: Array1<f64>,
    meta: ScanMetadata,
}

impl LineScan {
    /// Builds a scan without provenance from any sequence of numeric samples.
    pub fn new<I, T>(samples: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        Self::from_array(samples.into_iter().map(Into::into).collect())
    }

    pub fn from_array(samples: Array1<f64>) -> Self {
        let meta = ScanMetadata::identity(samples.len());
        Self { samples, meta }
    }

    /// Starts a builder for a scan with explicit metadata.
    pub fn builder<I, T>(samples: I) -> LineScanBuilder
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        LineScanBuilder::new(samples.into_iter().map(Into::into).collect())
    }

    pub fn from_parts(samples: Array1<f64>, meta: ScanMetadata) -> ScanResult<Self> {
        if samples.len() != meta.coordinates.len() {
            return Err(ScanError::Shape(format!(
                "{} samples but {} coordinates",
                samples.len(),
                meta.coordinates.len()
            )));
        }
        Ok(Self { samples, meta })
    }

    /// Copy constructor: a new scan holding `samples` and every metadata field of `self`.
    pub fn derive(&self, samples: Array1<f64>) -> ScanResult<Self> {
        Self::from_parts(samples, self.meta.clone())
    }

    /// Like [`derive`](Self::derive) but with a fresh coordinate sequence.
    pub fn derive_with_coordinates(
        &self,
        samples: Array1<f64>,
        coordinates: Arc<[Point]>,
    ) -> ScanResult<Self> {
        let meta = ScanMetadata {
            coordinates,
            ..self.meta.clone()
        };
        Self::from_parts(samples, meta)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.samples.get(index).copied()
    }

    pub fn iter(&self) -> ndarray::iter::Iter<'_, f64, Ix1> {
        self.samples.iter()
    }

    pub fn samples(&self) -> ArrayView1<'_, f64> {
        self.samples.view()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.to_vec()
    }

    pub fn metadata(&self) -> &ScanMetadata {
        &self.meta
    }

    pub fn coordinates(&self) -> &[Point] {
        &self.meta.coordinates
    }

    pub fn coordinate(&self, index: usize) -> Option<Point> {
        self.meta.coordinates.get(index).copied()
    }

    pub fn source(&self) -> Option<&SourceHandle> {
        self.meta.source.as_ref()
    }

    pub fn endpoints(&self) -> Option<(Point, Point)> {
        self.meta.endpoints
    }

    pub fn row(&self) -> Option<usize> {
        self.meta.row
    }

    pub fn col(&self) -> Option<usize> {
        self.meta.col
    }

    pub fn channel(&self) -> Channel {
        self.meta.channel
    }

    /// Contiguous sub-scan; coordinates are sliced alongside the samples.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> ScanResult<Self> {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.len(),
        };
        if start > end || end > self.len() {
            return Err(ScanError::OutOfRange(format!(
                "slice {}..{} of scan with {} samples",
                start,
                end,
                self.len()
            )));
        }

        let samples = self.samples.slice(s![start..end]).to_owned();
        let coordinates: Arc<[Point]> = Arc::from(&self.meta.coordinates[start..end]);
        self.derive_with_coordinates(samples, coordinates)
    }

    /// Compares sample values only, ignoring metadata.
    pub fn sample_eq(&self, other: &Self) -> bool {
        self.samples == other.samples
    }
}

impl Index<usize> for LineScan {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.samples[index]
    }
}

impl<'a> IntoIterator for &'a LineScan {
    type Item = &'a f64;
    type IntoIter = ndarray::iter::Iter<'a, f64, Ix1>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl<T: Into<f64>> FromIterator<T> for LineScan {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Explicit construction of a [`LineScan`] with provenance.
///
/// Fields left unset fall back to the parent given to [`inherit`](Self::inherit),
/// then to the provenance-free defaults.
#[derive(Debug, Clone)]
pub struct LineScanBuilder {
    samples: Array1<f64>,
    coordinates: Option<Arc<[Point]>>,
    source: Option<SourceHandle>,
    endpoints: Option<(Point, Point)>,
    row: Option<usize>,
    col: Option<usize>,
    channel: Option<Channel>,
    parent: Option<ScanMetadata>,
}

impl LineScanBuilder {
    fn new(samples: Array1<f64>) -> Self {
        Self {
            samples,
            coordinates: None,
            source: None,
            endpoints: None,
            row: None,
            col: None,
            channel: None,
            parent: None,
        }
    }

    pub fn coordinates<I: IntoIterator<Item = Point>>(mut self, coordinates: I) -> Self {
        self.coordinates = Some(coordinates.into_iter().collect());
        self
    }

    pub fn source(mut self, source: SourceHandle) -> Self {
        self.source = Some(source);
        self
    }

    pub fn endpoints(mut self, a: Point, b: Point) -> Self {
        self.endpoints = Some((a, b));
        self
    }

    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn col(mut self, col: usize) -> Self {
        self.col = Some(col);
        self
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn inherit(mut self, parent: &LineScan) -> Self {
        self.parent = Some(parent.meta.clone());
        self
    }

    pub fn build(self) -> ScanResult<LineScan> {
        let base = self
            .parent
            .unwrap_or_else(|| ScanMetadata::identity(self.samples.len()));
        let meta = ScanMetadata {
            coordinates: self.coordinates.unwrap_or(base.coordinates),
            source: self.source.or(base.source),
            endpoints: self.endpoints.or(base.endpoints),
            row: self.row.or(base.row),
            col: self.col.or(base.col),
            channel: self.channel.unwrap_or(base.channel),
        };
        LineScan::from_parts(self.samples, meta)
    }
}
