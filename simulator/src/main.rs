use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Line-scan analysis workflow driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Number of samples along the synthetic line
    #[arg(long, default_value_t = 256)]
    length: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Amplitude of the uniform noise added to every sample
    #[arg(long, default_value_t = 2.0)]
    noise: f64,
    /// Peak/valley detection window
    #[arg(long, default_value_t = 30)]
    window: usize,
    #[arg(long, default_value_t = 3.0)]
    delta: f64,
    /// Write the full result as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.length, args.seed, args.noise, args.window, args.delta)
    };
    info!(
        "running {} stage(s) over a {}-sample profile",
        workflow_config.stages.len(),
        workflow_config.profile.length
    );

    let runner = Runner::new(workflow_config);
    let result = runner.execute()?;

    println!(
        "Workflow [{}] -> samples {}, peaks {:?}, valleys {:?}, mean {:.3}, deviation {:.3}",
        result.stages.join(" -> "),
        result.samples.len(),
        result.peaks.iter().map(|p| p.index).collect::<Vec<_>>(),
        result.valleys.iter().map(|v| v.index).collect::<Vec<_>>(),
        result.mean,
        result.deviation
    );

    if let Some(report_path) = args.report {
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        fs::write(&report_path, result.to_json()?)
            .with_context(|| format!("writing report {}", report_path.display()))?;
        info!("report written to {}", report_path.display());
    }

    Ok(())
}
