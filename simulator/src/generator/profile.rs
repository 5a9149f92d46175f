use linescan::{Channel, ImageSampler, LineSample, Point, ScanError, ScanResult, SourceHandle};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Gaussian-shaped feature added to (or, for dips, removed from) the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bump {
    pub center: f64,
    pub width: f64,
    pub height: f64,
}

impl Bump {
    fn at(&self, x: f64) -> f64 {
        let offset = x - self.center;
        self.height * (-(offset * offset) / (2.0 * self.width * self.width)).exp()
    }
}

/// Configuration for generating synthetic intensity profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub length: usize,
    pub baseline: f64,
    pub bumps: Vec<Bump>,
    pub dips: Vec<Bump>,
    pub noise: f64,
    pub seed: u64,
    pub channel: Channel,
    pub endpoints: (Point, Point),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: 256,
            baseline: 20.0,
            bumps: vec![
                Bump {
                    center: 64.0,
                    width: 4.0,
                    height: 180.0,
                },
                Bump {
                    center: 170.0,
                    width: 6.0,
                    height: 120.0,
                },
            ],
            dips: vec![Bump {
                center: 120.0,
                width: 5.0,
                height: 15.0,
            }],
            noise: 2.0,
            seed: 0,
            channel: Channel::Gray,
            endpoints: ((0.0, 0.0), (255.0, 0.0)),
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> ScanResult<()> {
        if self.length == 0 {
            return Err(ScanError::OutOfRange("profile length must be positive".into()));
        }
        if let Some(bump) = self.bumps.iter().chain(&self.dips).find(|b| !(b.width > 0.0)) {
            return Err(ScanError::OutOfRange(format!(
                "feature at {} has non-positive width {}",
                bump.center, bump.width
            )));
        }
        Ok(())
    }

    fn intensity(&self, x: f64) -> f64 {
        let raised: f64 = self.bumps.iter().map(|b| b.at(x)).sum();
        let lowered: f64 = self.dips.iter().map(|b| b.at(x)).sum();
        self.baseline + raised - lowered
    }
}

/// Stand-in for an image: every line is sampled from the same synthetic profile.
pub struct SyntheticSampler {
    config: GeneratorConfig,
    source: SourceHandle,
}

impl SyntheticSampler {
    pub fn new(config: GeneratorConfig) -> Self {
        let source = SourceHandle::new(config.clone());
        Self { config, source }
    }
}

impl ImageSampler for SyntheticSampler {
    fn sample_line(&self, a: Point, b: Point, channel: Channel) -> ScanResult<LineSample> {
        self.config.validate()?;
        let length = self.config.length;
        let span = (length.max(2) - 1) as f64;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut samples = Vec::with_capacity(length);
        let mut coordinates = Vec::with_capacity(length);
        for index in 0..length {
            let t = index as f64 / span;
            coordinates.push((a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)));
            let jitter = if self.config.noise > 0.0 {
                rng.gen_range(-self.config.noise..self.config.noise)
            } else {
                0.0
            };
            let value = self.config.intensity(index as f64) + jitter;
            samples.push(value.clamp(0.0, 255.0));
        }

        Ok(LineSample {
            samples,
            coordinates,
            endpoints: Some((a, b)),
            row: None,
            col: None,
            channel,
        })
    }

    fn source(&self) -> Option<SourceHandle> {
        Some(self.source.clone())
    }
}
