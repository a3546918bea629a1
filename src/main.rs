use std::time::Instant;

use anyhow::Context;
use arms_recurrence::PipelineConfig;
use arms_recurrence::pipeline::run_all;
use log::info;

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_args().context("Failed to load pipeline configuration")?;
    let start = Instant::now();

    let outputs = run_all(&config).context("Pipeline run failed")?;

    if let Some(effect) = outputs.coefficient("new_arms_tiv_lag") {
        info!(
            "new_arms_tiv_lag: coef = {:.4} (p = {:.4})",
            effect.coef, effect.pval
        );
    }
    info!(
        "Finished in {:?}; outputs written to {}",
        start.elapsed(),
        config.output_dir.display()
    );
    Ok(())
}
