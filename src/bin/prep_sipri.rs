//! Normalize the SIPRI trade register into `SIPRI_prepared.csv`

use anyhow::Context;
use arms_recurrence::PipelineConfig;
use arms_recurrence::pipeline::prepare_sipri;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_args().context("Failed to load pipeline configuration")?;
    let records = prepare_sipri(&config)
        .with_context(|| format!("Failed to prepare {}", config.sipri_path().display()))?;
    log::info!("Prepared {} SIPRI country-years", records.len());
    Ok(())
}
