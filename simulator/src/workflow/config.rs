use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use linescan::{DetectionConfig, StageConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_stages() -> Vec<StageConfig> {
    vec![StageConfig::Smooth { degree: 2 }]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub profile: GeneratorConfig,
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(length: usize, seed: u64, noise: f64, window: usize, delta: f64) -> Self {
        Self {
            profile: GeneratorConfig {
                length,
                seed,
                noise,
                ..Default::default()
            },
            stages: default_stages(),
            detection: DetectionConfig { window, delta },
        }
    }
}
