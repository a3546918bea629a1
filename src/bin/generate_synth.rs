//! Write a seeded synthetic modeling dataset

use anyhow::Context;
use arms_recurrence::pipeline::generate_synth;
use arms_recurrence::{PipelineConfig, SynthConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_args().context("Failed to load pipeline configuration")?;
    let path = generate_synth(&config, &SynthConfig::default())
        .context("Failed to write synthetic dataset")?;
    log::info!("Synthetic dataset written to {}", path.display());
    Ok(())
}
