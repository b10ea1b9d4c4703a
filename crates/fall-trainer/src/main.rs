//! Fall Trainer - Main Entry Point

use anyhow::Context;
use fall_trainer::{init_logging, run, PipelineConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Fall Trainer v{} ===", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load().context("failed to load configuration")?;
    let report = run(&config).context("training pipeline failed")?;

    println!("{}", report.training.report);
    info!(
        "Model written to {} ({} samples, labels {:?})",
        report.output_path.display(),
        report.features.len(),
        report.label_source
    );

    Ok(())
}
