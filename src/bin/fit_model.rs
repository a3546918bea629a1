//! Fit the recurrence logit and write tables and figures

use anyhow::Context;
use arms_recurrence::PipelineConfig;
use arms_recurrence::pipeline::{load_model_input, run_model};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_args().context("Failed to load pipeline configuration")?;
    let observations =
        load_model_input(&config, None).context("Failed to load the modeling dataset")?;
    let outputs = run_model(&config, &observations).context("Model stage failed")?;

    log::info!(
        "Fitted {} coefficients on {} observations (converged = {})",
        outputs.coefficients.len(),
        outputs.summary.n_obs,
        outputs.summary.converged
    );
    Ok(())
}
