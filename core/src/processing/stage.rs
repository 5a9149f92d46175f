use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::lut::{Lut, LutSeed};
use super::smoothing::KernelKind;
use crate::prelude::{ProcessingStage, ScanResult};
use crate::scan::LineScan;
use crate::telemetry::log::ScanLogger;

fn default_invert_max() -> f64 {
    255.0
}

fn default_threshold() -> f64 {
    128.0
}

/// Declarative description of one pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StageConfig {
    Smooth {
        degree: usize,
    },
    RunningAverage {
        diameter: usize,
        #[serde(default)]
        kernel: KernelKind,
    },
    Median {
        size: usize,
    },
    MedianFilter {
        kernel_size: usize,
    },
    Convolve {
        kernel: Vec<f64>,
    },
    Normalize,
    Scale {
        low: f64,
        high: f64,
    },
    Threshold {
        #[serde(default = "default_threshold")]
        cutoff: f64,
        #[serde(default)]
        invert: bool,
    },
    Invert {
        #[serde(default = "default_invert_max")]
        max: f64,
    },
    Derivative,
    Detrend,
    Resample {
        samples: usize,
    },
    ApplyLut {
        #[serde(default)]
        seed: LutSeed,
    },
}

impl ProcessingStage for StageConfig {
    fn name(&self) -> &'static str {
        match self {
            StageConfig::Smooth { .. } => "smooth",
            StageConfig::RunningAverage { .. } => "running_average",
            StageConfig::Median { .. } => "median",
            StageConfig::MedianFilter { .. } => "median_filter",
            StageConfig::Convolve { .. } => "convolve",
            StageConfig::Normalize => "normalize",
            StageConfig::Scale { .. } => "scale",
            StageConfig::Threshold { .. } => "threshold",
            StageConfig::Invert { .. } => "invert",
            StageConfig::Derivative => "derivative",
            StageConfig::Detrend => "detrend",
            StageConfig::Resample { .. } => "resample",
            StageConfig::ApplyLut { .. } => "apply_lut",
        }
    }

    fn execute(&self, input: &LineScan) -> ScanResult<LineScan> {
        match self {
            StageConfig::Smooth { degree } => input.smooth(*degree),
            StageConfig::RunningAverage { diameter, kernel } => input.running_average(*diameter, *kernel),
            StageConfig::Median { size } => input.median(*size),
            StageConfig::MedianFilter { kernel_size } => input.median_filter(*kernel_size),
            StageConfig::Convolve { kernel } => input.convolve(ArrayView1::from(kernel.as_slice())),
            StageConfig::Normalize => input.normalize(),
            StageConfig::Scale { low, high } => input.scale((*low, *high)),
            StageConfig::Threshold { cutoff, invert } => input.threshold(*cutoff, *invert),
            StageConfig::Invert { max } => input.invert(*max),
            StageConfig::Derivative => input.derivative(),
            StageConfig::Detrend => input.detrend(),
            StageConfig::Resample { samples } => input.resample(*samples),
            StageConfig::ApplyLut { seed } => input.apply_lut(&Lut::build(*seed)),
        }
    }
}

/// Ordered chain of stages applied to a scan.
pub struct Pipeline {
    stages: Vec<Box<dyn ProcessingStage>>,
    logger: ScanLogger,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            logger: ScanLogger::default(),
        }
    }

    pub fn from_configs<I: IntoIterator<Item = StageConfig>>(configs: I) -> Self {
        configs
            .into_iter()
            .fold(Self::new(), |pipeline, config| pipeline.with_stage(config))
    }

    pub fn with_stage<S: ProcessingStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage in order; the first failing stage aborts the run.
    pub fn run(&self, input: &LineScan) -> ScanResult<LineScan> {
        let mut current = input.clone();
        for stage in &self.stages {
            current = stage.execute(&current)?;
            self.logger.record_stage(stage.name(), &current);
        }
        Ok(current)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ScanError;

    #[test]
    fn pipeline_runs_stages_in_order() {
        let pipeline = Pipeline::from_configs([
            StageConfig::Invert { max: 255.0 },
            StageConfig::Threshold {
                cutoff: 128.0,
                invert: false,
            },
        ]);
        assert_eq!(pipeline.stage_names(), vec!["invert", "threshold"]);
        let output = pipeline.run(&LineScan::new([0, 100, 200])).unwrap();
        assert_eq!(output.to_vec(), vec![255.0, 255.0, 0.0]);
    }

    #[test]
    fn pipeline_stops_at_first_error() {
        let pipeline = Pipeline::from_configs([StageConfig::Normalize, StageConfig::Derivative]);
        let err = pipeline.run(&LineScan::new([0.0, 0.0])).unwrap_err();
        assert!(matches!(err, ScanError::DivideByZero(_)));
    }

    #[test]
    fn stage_configs_deserialize_from_tagged_json() {
        let json = r#"[
            {"op": "smooth", "degree": 3},
            {"op": "running_average", "diameter": 5, "kernel": "gaussian"},
            {"op": "threshold", "cutoff": 90},
            {"op": "apply_lut", "seed": [0, 128]},
            {"op": "normalize"}
        ]"#;
        let stages: Vec<StageConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(stages[0], StageConfig::Smooth { degree: 3 });
        assert_eq!(
            stages[1],
            StageConfig::RunningAverage {
                diameter: 5,
                kernel: KernelKind::Gaussian
            }
        );
        assert_eq!(
            stages[2],
            StageConfig::Threshold {
                cutoff: 90.0,
                invert: false
            }
        );
        assert_eq!(
            stages[3],
            StageConfig::ApplyLut {
                seed: LutSeed::Range(0.0, 128.0)
            }
        );
        assert_eq!(stages[4], StageConfig::Normalize);
    }
}
