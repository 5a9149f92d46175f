use ndarray::ArrayView1;

pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean; `NaN` for an empty view.
    pub fn mean(samples: ArrayView1<f64>) -> f64 {
        samples.sum() / samples.len() as f64
    }

    /// Population variance; `NaN` for an empty view.
    pub fn variance(samples: ArrayView1<f64>) -> f64 {
        let mean = Self::mean(samples);
        let sum_sq: f64 = samples.iter().map(|&v| (v - mean) * (v - mean)).sum();
        sum_sq / samples.len() as f64
    }

    /// Median of the values; even-length input averages the two middle values.
    pub fn median(samples: ArrayView1<f64>) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            Some(sorted[mid])
        } else {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        }
    }

    /// `(min, max)` ignoring `NaN`; `None` when no finite comparison is possible.
    pub fn min_max(samples: ArrayView1<f64>) -> Option<(f64, f64)> {
        samples
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
