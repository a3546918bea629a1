use std::fs;
use std::path::PathBuf;

use arms_recurrence::config::outputs;
use arms_recurrence::pipeline::{
    generate_synth, load_model_input, merge_prepared, prepare_sipri, prepare_ucdp, prepare_wdi,
    run_all, run_model,
};
use arms_recurrence::{ModelSource, PipelineConfig, PipelineError, Stage, SynthConfig};

use crate::utils::{panel_config, test_config, write_raw_fixtures, write_synthetic_sources};

fn header(path: &PathBuf) -> String {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string()
}

#[test]
fn test_prepared_tables_have_documented_columns() {
    let dir = tempfile::tempdir().unwrap();
    write_raw_fixtures(dir.path());
    let config = test_config(dir.path());

    prepare_wdi(&config).unwrap();
    prepare_sipri(&config).unwrap();
    prepare_ucdp(&config).unwrap();
    let panel = merge_prepared(&config).unwrap();
    assert_eq!(panel.len(), 3);

    assert_eq!(
        header(&config.output_path(outputs::WDI_PREPARED)),
        "country,country_code,year,gov_effect,gdp_pc,pop,log_gdp_pc,log_pop"
    );
    assert_eq!(
        header(&config.output_path(outputs::SIPRI_PREPARED)),
        "country,year,new_arms_tiv,second_hand_arms_tiv"
    );
    assert_eq!(
        header(&config.output_path(outputs::UCDP_PREPARED)),
        "country,year,recurrence"
    );
    assert_eq!(
        header(&config.output_path(outputs::ANALYSIS_PANEL)),
        "country,country_code,year,gov_effect,gdp_pc,pop,log_gdp_pc,log_pop,new_arms_tiv,second_hand_arms_tiv,recurrence"
    );

    // No temporary files are left next to the outputs
    for entry in fs::read_dir(&config.output_dir).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().into_owned();
        assert!(!name.ends_with(".tmp"), "left over {name}");
    }
}

#[test]
fn test_full_run_on_synthetic_sources_recovers_effect() {
    let dir = tempfile::tempdir().unwrap();
    write_synthetic_sources(dir.path(), &SynthConfig::default());
    let config = panel_config(dir.path());

    let results = run_all(&config).unwrap();

    let new_lag = results.coefficient("new_arms_tiv_lag").unwrap();
    assert!(new_lag.coef > 0.0);
    assert_eq!(results.coefficients.len(), 6);
    assert_eq!(results.marginal_effects.len(), 5);

    assert_eq!(
        header(&config.output_path(outputs::LOGIT_RESULTS)),
        "variable,coef,std_err,z,pval,ci_lower,ci_upper"
    );
    assert_eq!(
        header(&config.output_path(outputs::MARGINAL_EFFECTS)),
        "variable,dydx,std_err,z,pval,ci_lower,ci_upper"
    );
    let stats = fs::read_to_string(config.output_path(outputs::DESCRIPTIVE_STATS)).unwrap();
    assert!(stats.contains("new_arms_tiv_lag"));
    assert!(stats.contains("Recurrence frequencies"));
}

#[test]
fn test_model_stage_reads_generated_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    assert_eq!(
        config.model_source,
        ModelSource::File(PathBuf::from("synthbs.csv"))
    );

    let path = generate_synth(&config, &SynthConfig::default()).unwrap();
    assert_eq!(path, dir.path().join("synthbs.csv"));

    let observations = load_model_input(&config, None).unwrap();
    assert_eq!(observations.len(), 40 * 15);
    assert!(observations.iter().any(|o| o.gov_effect.is_none()));

    let results = run_model(&config, &observations).unwrap();
    assert!(results.coefficient("new_arms_tiv_lag").unwrap().coef > 0.0);
    assert!(config.output_path(outputs::LOGIT_RESULTS).exists());
}

#[test]
fn test_modeling_file_accepts_boolean_flags_and_extra_columns() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    fs::write(
        dir.path().join("synthbs.csv"),
        "country,year,region,new_arms_tiv,second_hand_arms_tiv,gov_effect,log_gdp_pc,log_pop,recurrence\n\
         Chad,2010.0,Africa,5,1,-1.2,6.5,16.2,true\n\
         Chad,2011,Africa,,1,-1.2,6.5,16.2,false\n\
         Mali,2010,Africa,3,0,-0.8,6.7,16.5,\n",
    )
    .unwrap();

    let observations = load_model_input(&config, None).unwrap();
    assert_eq!(observations.len(), 3);
    assert_eq!(observations[0].year, 2010);
    assert_eq!(observations[0].recurrence, Some(1.0));
    assert_eq!(observations[1].new_arms_tiv, None);
    assert_eq!(observations[1].recurrence, Some(0.0));
    assert_eq!(observations[2].recurrence, None);
}

#[test]
fn test_modeling_file_missing_tokens_are_dropped_listwise() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let path = generate_synth(&config, &SynthConfig::default()).unwrap();

    // Blank out two cells of the first country with NA-style tokens
    let text = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    for (line, token) in [(3, "NaN"), (5, "NA")] {
        let mut cells: Vec<&str> = lines[line].split(',').collect();
        cells[4] = token;
        lines[line] = cells.join(",");
    }
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let observations = load_model_input(&config, None).unwrap();
    assert_eq!(observations.len(), 40 * 15);
    assert_eq!(observations[2].gov_effect, None);
    assert_eq!(observations[4].gov_effect, None);

    let results = run_model(&config, &observations).unwrap();
    assert!(results.summary.n_obs < observations.len());
    assert!(results.coefficient("gov_effect").unwrap().coef.is_finite());
}

#[test]
fn test_modeling_file_without_required_column_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    fs::write(
        dir.path().join("synthbs.csv"),
        "country,year,new_arms_tiv,second_hand_arms_tiv,log_gdp_pc,log_pop,recurrence\n\
         Chad,2010,5,1,6.5,16.2,1\n",
    )
    .unwrap();

    let err = load_model_input(&config, None).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parse {
            stage: Stage::FeatureBuilder,
            ..
        }
    ));
    assert!(err.to_string().contains("'gov_effect'"));
}

#[test]
fn test_missing_extract_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::with_dirs(dir.path(), dir.path());
    let err = prepare_wdi(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}

#[test]
fn test_empty_intersection_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_raw_fixtures(dir.path());
    fs::write(
        dir.path().join("ucpd-termination.csv"),
        "location,year,recur\nNorway,1990,0\n",
    )
    .unwrap();
    let config = test_config(dir.path());

    let wdi = prepare_wdi(&config).unwrap();
    let sipri = prepare_sipri(&config).unwrap();
    let ucdp = prepare_ucdp(&config).unwrap();
    let panel = arms_recurrence::pipeline::merge_panel(&config, &wdi, &sipri, &ucdp).unwrap();

    assert!(panel.is_empty());
    let written = fs::read_to_string(config.output_path(outputs::ANALYSIS_PANEL)).unwrap();
    assert_eq!(written.lines().count(), 1);
}
