//! Normalize the WDI indicator export into `WDI_prepared.csv`

use anyhow::Context;
use arms_recurrence::PipelineConfig;
use arms_recurrence::pipeline::prepare_wdi;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_args().context("Failed to load pipeline configuration")?;
    let records = prepare_wdi(&config)
        .with_context(|| format!("Failed to prepare {}", config.wdi_path().display()))?;
    log::info!("Prepared {} WDI country-years", records.len());
    Ok(())
}
