use crate::generator::profile::SyntheticSampler;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use linescan::telemetry::ScanLogger;
use linescan::{Extremum, Feature, LineScan, Pipeline};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub stages: Vec<String>,
    pub samples: Vec<f64>,
    pub peaks: Vec<Feature>,
    pub valleys: Vec<Feature>,
    pub maxima: Vec<Extremum>,
    pub minima: Vec<Extremum>,
    pub mean: f64,
    pub deviation: f64,
}

impl WorkflowResult {
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("serializing workflow result")
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let profile = &self.config.profile;
        let sampler = SyntheticSampler::new(profile.clone());
        let (a, b) = profile.endpoints;
        let scan = LineScan::sample_from(&sampler, a, b, profile.channel)
            .context("sampling synthetic profile")?;

        let pipeline = Pipeline::from_configs(self.config.stages.iter().cloned());
        let processed = pipeline
            .run(&scan)
            .context("executing processing pipeline")?;

        let detection = &self.config.detection;
        let peaks = processed
            .detect_peaks(detection)
            .context("detecting peaks")?;
        let valleys = processed
            .detect_valleys(detection)
            .context("detecting valleys")?;
        let logger = ScanLogger::default();
        logger.record_features("peaks", peaks.len());
        logger.record_features("valleys", valleys.len());

        let mean = processed.mean().context("computing mean")?;
        let deviation = processed.deviation().context("computing deviation")?;

        Ok(WorkflowResult {
            stages: pipeline
                .stage_names()
                .into_iter()
                .map(String::from)
                .collect(),
            samples: processed.to_vec(),
            peaks,
            valleys,
            maxima: processed.maxima(),
            minima: processed.minima(),
            mean,
            deviation,
        })
    }
}
