use arms_recurrence::algorithm::logit::INTERCEPT;
use arms_recurrence::{
    DesignMatrix, Feature, LogitConfig, PipelineError, Stage, SynthConfig,
    average_marginal_effects, build_features, fit_logit, generate_observations,
};

fn design(synth: &SynthConfig) -> DesignMatrix {
    let rows = build_features(&generate_observations(synth)).unwrap();
    DesignMatrix::from_rows(&rows).unwrap()
}

#[test]
fn test_injected_effect_is_recovered() {
    let design = design(&SynthConfig::default());
    let model = fit_logit(&design, &LogitConfig::default()).unwrap();
    let table = model.coefficients().unwrap();

    assert!(model.summary.converged);
    assert_eq!(table.len(), Feature::ALL.len() + 1);
    assert_eq!(table[0].variable, INTERCEPT);

    let new_lag = table
        .iter()
        .find(|c| c.variable == "new_arms_tiv_lag")
        .unwrap();
    assert!(new_lag.coef > 0.0);
    assert!(new_lag.pval < 0.05);
    assert!(model.summary.pseudo_r2 > 0.0);
    assert!(model.summary.log_likelihood > model.summary.null_log_likelihood);
}

#[test]
fn test_fit_is_deterministic() {
    let design = design(&SynthConfig {
        seed: 11,
        ..Default::default()
    });
    let first = fit_logit(&design, &LogitConfig::default()).unwrap();
    let second = fit_logit(&design, &LogitConfig::default()).unwrap();
    assert_eq!(first.coefficients().unwrap(), second.coefficients().unwrap());
}

#[test]
fn test_marginal_effects_follow_coefficients() {
    let design = design(&SynthConfig::default());
    let model = fit_logit(&design, &LogitConfig::default()).unwrap();
    let effects = average_marginal_effects(&model, &design).unwrap();

    let names: Vec<&str> = effects.iter().map(|e| e.variable.as_str()).collect();
    let expected: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
    assert_eq!(names, expected);

    for (j, effect) in effects.iter().enumerate() {
        let coef = model.params[j + 1];
        assert_eq!(effect.dydx.signum(), coef.signum());
        // The AME is the coefficient scaled by a mean density below 1/4
        assert!(effect.dydx.abs() <= coef.abs() * 0.25 + 1e-12);
        assert!(effect.ci_lower <= effect.dydx && effect.dydx <= effect.ci_upper);
    }
}

#[test]
fn test_smuggled_nan_fails_before_fitting() {
    let mut rows = build_features(&generate_observations(&SynthConfig::default())).unwrap();
    rows[3].log_pop = f64::NAN;
    let err = DesignMatrix::from_rows(&rows).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::DataInvariant {
            stage: Stage::ModelFitter,
            ..
        }
    ));
    assert!(err.to_string().contains("log_pop"));
}

#[test]
fn test_too_few_observations_is_model_error() {
    let design = design(&SynthConfig {
        countries: 1,
        years: 4,
        missing_rate: 0.0,
        ..Default::default()
    });
    assert!(matches!(
        fit_logit(&design, &LogitConfig::default()),
        Err(PipelineError::Model(_))
    ));
}
