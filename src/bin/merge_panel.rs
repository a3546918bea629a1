//! Join the prepared tables into `analysis_panel.csv`

use anyhow::Context;
use arms_recurrence::PipelineConfig;
use arms_recurrence::pipeline::merge_prepared;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_args().context("Failed to load pipeline configuration")?;
    let panel = merge_prepared(&config).context("Failed to assemble the analysis panel")?;
    log::info!("Analysis panel has {} rows", panel.len());
    Ok(())
}
