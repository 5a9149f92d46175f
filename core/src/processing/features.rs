//! Extremum search and windowed peak/valley detection.

use log::trace;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;
use crate::prelude::{DetectionConfig, ScanError, ScanResult};
use crate::scan::{LineScan, Point};

/// A sample singled out by an extremum search, with its image coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub index: usize,
    pub value: f64,
    pub coordinate: Point,
}

/// A peak or valley reported by the windowed finders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub index: usize,
    pub value: f64,
}

const MAXIMA: f64 = 1.0;
const MINIMA: f64 = -1.0;

impl LineScan {
    /// Every index holding the global minimum.
    pub fn minima(&self) -> Vec<Extremum> {
        match StatsHelper::min_max(self.samples()) {
            Some((min, _)) => self.extrema_where(|_, v| v == min),
            None => Vec::new(),
        }
    }

    /// Every index holding the global maximum.
    pub fn maxima(&self) -> Vec<Extremum> {
        match StatsHelper::min_max(self.samples()) {
            Some((_, max)) => self.extrema_where(|_, v| v == max),
            None => Vec::new(),
        }
    }

    /// Samples strictly below both neighbours; the end samples only need to be
    /// below their single neighbour.
    pub fn local_minima(&self) -> Vec<Extremum> {
        self.local_extrema(MINIMA)
    }

    /// Samples strictly above both neighbours; the end samples only need to be
    /// above their single neighbour.
    pub fn local_maxima(&self) -> Vec<Extremum> {
        self.local_extrema(MAXIMA)
    }

    /// Peaks that dominate every other sample of their window by at least `delta`.
    ///
    /// The scan keeps a running maximum at position `p`. It is compared with the
    /// other samples in `[p - window/2, p + window/2)`, clipped to the scan; once
    /// it beats all of them by `delta` it is reported and the running maximum
    /// resets. A running maximum that still fails when the scan reaches
    /// `p + window/2` is dropped, so a shoulder cannot block later peaks.
    /// An odd `window` behaves like `window - 1`; windows below 2 are rejected.
    pub fn find_peaks(&self, window: usize, delta: f64) -> ScanResult<Vec<Feature>> {
        validate_detection(window, delta)?;
        let peaks = dominant_features(self.samples(), window, delta, MAXIMA);
        trace!("{} peaks (window {}, delta {})", peaks.len(), window, delta);
        Ok(peaks)
    }

    /// Mirror image of [`find_peaks`](Self::find_peaks) using a running minimum.
    pub fn find_valleys(&self, window: usize, delta: f64) -> ScanResult<Vec<Feature>> {
        validate_detection(window, delta)?;
        let valleys = dominant_features(self.samples(), window, delta, MINIMA);
        trace!("{} valleys (window {}, delta {})", valleys.len(), window, delta);
        Ok(valleys)
    }

    pub fn detect_peaks(&self, config: &DetectionConfig) -> ScanResult<Vec<Feature>> {
        self.find_peaks(config.window, config.delta)
    }

    pub fn detect_valleys(&self, config: &DetectionConfig) -> ScanResult<Vec<Feature>> {
        self.find_valleys(config.window, config.delta)
    }

    fn extrema_where<P: Fn(usize, f64) -> bool>(&self, keep: P) -> Vec<Extremum> {
        let coordinates = self.coordinates();
        self.iter()
            .enumerate()
            .filter(|&(i, &v)| keep(i, v))
            .map(|(i, &value)| Extremum {
                index: i,
                value,
                coordinate: coordinates[i],
            })
            .collect()
    }

    fn local_extrema(&self, sign: f64) -> Vec<Extremum> {
        let samples = self.samples();
        let last = self.len().saturating_sub(1);
        self.extrema_where(|i, v| {
            let v = sign * v;
            let left = i == 0 || v > sign * samples[i - 1];
            let right = i == last || v > sign * samples[i + 1];
            left && right
        })
    }
}

fn validate_detection(window: usize, delta: f64) -> ScanResult<()> {
    if window < 2 {
        return Err(ScanError::OutOfRange(format!(
            "detection window must be at least 2, got {}",
            window
        )));
    }
    if !(delta > 0.0) {
        return Err(ScanError::OutOfRange(format!(
            "detection delta must be positive, got {}",
            delta
        )));
    }
    Ok(())
}

/// Shared peak/valley scan; `sign` flips valleys into peaks.
fn dominant_features(samples: ArrayView1<f64>, window: usize, delta: f64, sign: f64) -> Vec<Feature> {
    let n = samples.len();
    let width = window / 2;
    let mut features = Vec::new();
    let mut running: Option<(usize, f64)> = None;

    for i in 0..n {
        let value = sign * samples[i];
        if running.map_or(true, |(_, best)| value > best) {
            running = Some((i, value));
        }
        let Some((position, best)) = running else {
            continue;
        };

        let rival = (position.saturating_sub(width)..(position + width).min(n))
            .filter(|&j| j != position)
            .map(|j| sign * samples[j])
            .reduce(f64::max);
        if rival.map_or(false, |rival| best - rival >= delta) {
            features.push(Feature {
                index: position,
                value: sign * best,
            });
            running = None;
        } else if i >= position + width {
            running = None;
        }
    }

    features
}
