//! Normalize the UCDP termination records into `UCDP_prepared.csv`

use anyhow::Context;
use arms_recurrence::PipelineConfig;
use arms_recurrence::pipeline::prepare_ucdp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_args().context("Failed to load pipeline configuration")?;
    let records = prepare_ucdp(&config)
        .with_context(|| format!("Failed to prepare {}", config.ucdp_path().display()))?;
    log::info!("Prepared {} UCDP country-years", records.len());
    Ok(())
}
