//! Stage composition
//!
//! Each function here runs one stage of the analysis with its file IO: it
//! reads the stage's input from disk or takes it from the previous stage,
//! calls the pure transform, and writes the output under the configured
//! output directory. [`run_all`] chains them in order.

use std::path::PathBuf;

use crate::algorithm::logit::{
    CoefficientEstimate, DesignMatrix, FitSummary, LogitModel, MarginalEffect,
    average_marginal_effects, fit_logit,
};
use crate::algorithm::panel::{assemble_panel, build_features};
use crate::algorithm::synth::{SynthConfig, generate_observations};
use crate::config::{ModelSource, PipelineConfig, outputs};
use crate::error::{Result, Stage};
use crate::models::{
    ArrowSchema, Feature, MODEL_INPUT_COLUMNS, ModelingRow, PanelObservation, PanelRow,
    SipriRecord, UcdpRecord, WdiRecord,
};
use crate::report::{
    GroupedDistribution, PredictedCurve, descriptive_report, log_coefficients,
    render_coefficient_plot, render_distributions, render_marginal_effects,
    render_predicted_curve, write_coefficients, write_marginal_effects,
};
use crate::sources::{sipri, ucdp, wdi};
use crate::utils::io::{
    RawTable, read_checked_records, read_latin1_table, read_records, write_table, write_text,
};
use crate::utils::logging::console::print_table_preview;
use crate::utils::logging::{
    create_stage_progress_bar, finish_progress_bar, log_step, log_warning,
};

/// Number of stages of a full run
pub const TOTAL_STEPS: usize = 6;

/// Rows shown in the panel preview
const PREVIEW_ROWS: usize = 5;

/// Everything the model stage produced
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutputs {
    pub coefficients: Vec<CoefficientEstimate>,
    pub marginal_effects: Vec<MarginalEffect>,
    pub summary: FitSummary,
}

impl ModelOutputs {
    /// Estimate for a named coefficient
    #[must_use]
    pub fn coefficient(&self, variable: &str) -> Option<&CoefficientEstimate> {
        self.coefficients.iter().find(|c| c.variable == variable)
    }
}

/// WDI extract to `WDI_prepared.csv`
pub fn prepare_wdi(config: &PipelineConfig) -> Result<Vec<WdiRecord>> {
    let table = RawTable::read(&config.wdi_path(), "WDI extract")?;
    let records = wdi::normalize(&table)?;
    write_table(&records, &config.output_path(outputs::WDI_PREPARED))?;
    Ok(records)
}

/// SIPRI trade register to `SIPRI_prepared.csv`
pub fn prepare_sipri(config: &PipelineConfig) -> Result<Vec<SipriRecord>> {
    let table = read_latin1_table(
        &config.sipri_path(),
        config.sipri_preamble_lines,
        "SIPRI trade register",
    )?;
    let records = sipri::normalize(&table)?;
    write_table(&records, &config.output_path(outputs::SIPRI_PREPARED))?;
    Ok(records)
}

/// UCDP termination records to `UCDP_prepared.csv`
pub fn prepare_ucdp(config: &PipelineConfig) -> Result<Vec<UcdpRecord>> {
    let table = RawTable::read(&config.ucdp_path(), "UCDP termination dataset")?;
    let records = ucdp::normalize(&table)?;
    write_table(&records, &config.output_path(outputs::UCDP_PREPARED))?;
    Ok(records)
}

/// Join normalized tables into `analysis_panel.csv` and preview the result
pub fn merge_panel(
    config: &PipelineConfig,
    wdi: &[WdiRecord],
    sipri: &[SipriRecord],
    ucdp: &[UcdpRecord],
) -> Result<Vec<PanelRow>> {
    let panel = assemble_panel(wdi, sipri, ucdp)?;
    let batch = PanelRow::to_record_batch(&panel)?;
    print_table_preview("Panel", &batch, PREVIEW_ROWS)?;
    write_table(&panel, &config.output_path(outputs::ANALYSIS_PANEL))?;
    Ok(panel)
}

/// Join the prepared tables previously written to the output directory
pub fn merge_prepared(config: &PipelineConfig) -> Result<Vec<PanelRow>> {
    let wdi: Vec<WdiRecord> =
        read_records(&config.output_path(outputs::WDI_PREPARED), "prepared WDI table")?;
    let sipri: Vec<SipriRecord> =
        read_records(&config.output_path(outputs::SIPRI_PREPARED), "prepared SIPRI table")?;
    let ucdp: Vec<UcdpRecord> =
        read_records(&config.output_path(outputs::UCDP_PREPARED), "prepared UCDP table")?;
    merge_panel(config, &wdi, &sipri, &ucdp)
}

/// Observations for the model, from the configured source
///
/// With [`ModelSource::Panel`] the in-memory panel is used when given;
/// otherwise `analysis_panel.csv` is read back from the output directory.
pub fn load_model_input(
    config: &PipelineConfig,
    panel: Option<&[PanelRow]>,
) -> Result<Vec<PanelObservation>> {
    match (&config.model_source, panel) {
        (ModelSource::File(file), _) => read_checked_records(
            &config.input_path(file),
            "modeling dataset",
            &MODEL_INPUT_COLUMNS,
            Stage::FeatureBuilder,
        ),
        (ModelSource::Panel, Some(rows)) => Ok(rows.iter().map(PanelObservation::from).collect()),
        (ModelSource::Panel, None) => {
            let rows: Vec<PanelRow> =
                read_records(&config.output_path(outputs::ANALYSIS_PANEL), "analysis panel")?;
            Ok(rows.iter().map(PanelObservation::from).collect())
        }
    }
}

/// Write the descriptive statistics, tables and figures of a fitted model
fn write_reports(
    config: &PipelineConfig,
    rows: &[ModelingRow],
    design: &DesignMatrix,
    model: &LogitModel,
    results: &ModelOutputs,
) -> Result<()> {
    let descriptive = descriptive_report(rows);
    log::info!("Descriptive statistics:\n{descriptive}");
    write_text(&descriptive, &config.output_path(outputs::DESCRIPTIVE_STATS))?;

    write_coefficients(&results.coefficients, &config.output_path(outputs::LOGIT_RESULTS))?;
    write_marginal_effects(
        &results.marginal_effects,
        &config.output_path(outputs::MARGINAL_EFFECTS),
    )?;

    if !config.plot.render {
        log::info!("Figure rendering disabled; skipping plots");
        return Ok(());
    }
    render_marginal_effects(
        &results.marginal_effects,
        &config.output_path(outputs::MARGINAL_EFFECTS_BARPLOT),
        &config.plot,
    )?;
    for feature in Feature::ARMS_LAGS {
        let curve = PredictedCurve::compute(model, design, feature, config.plot.curve_points)?;
        render_predicted_curve(
            &curve,
            &config.output_path(&outputs::marginal_effect_curve(feature.name())),
            &config.plot,
        )?;
    }
    render_coefficient_plot(
        &results.coefficients,
        &config.output_path(outputs::COEF_PLOT),
        &config.plot,
    )?;
    let distributions: Vec<GroupedDistribution> = Feature::ARMS_LAGS
        .iter()
        .map(|&feature| GroupedDistribution::from_rows(rows, feature))
        .collect();
    render_distributions(
        &distributions,
        &config.output_path(outputs::TIV_DISTRIBUTION),
        &config.plot,
    )
}

/// Intermediate and final products of a model fit
#[derive(Debug, Clone)]
pub struct Estimation {
    pub rows: Vec<ModelingRow>,
    pub design: DesignMatrix,
    pub model: LogitModel,
    pub results: ModelOutputs,
}

/// Fit the model on observations without writing anything
pub fn estimate(config: &PipelineConfig, observations: &[PanelObservation]) -> Result<Estimation> {
    let rows = build_features(observations)?;
    let design = DesignMatrix::from_rows(&rows)?;
    let model = fit_logit(&design, &config.logit)?;
    let results = ModelOutputs {
        coefficients: model.coefficients()?,
        marginal_effects: average_marginal_effects(&model, &design)?,
        summary: model.summary,
    };
    Ok(Estimation {
        rows,
        design,
        model,
        results,
    })
}

/// Build features, fit the logit and write every report
pub fn run_model(config: &PipelineConfig, observations: &[PanelObservation]) -> Result<ModelOutputs> {
    let estimation = estimate(config, observations)?;
    log_coefficients(&estimation.results.coefficients);
    write_reports(
        config,
        &estimation.rows,
        &estimation.design,
        &estimation.model,
        &estimation.results,
    )?;
    Ok(estimation.results)
}

/// Write a seeded synthetic modeling dataset to the configured model input file
pub fn generate_synth(config: &PipelineConfig, synth: &SynthConfig) -> Result<PathBuf> {
    let file = match &config.model_source {
        ModelSource::File(file) => file.clone(),
        ModelSource::Panel => PathBuf::from("synthbs.csv"),
    };
    let path = config.input_path(&file);
    if path.exists() {
        log_warning("Overwriting existing modeling dataset", Some(&path));
    }
    let observations = generate_observations(synth);
    write_table(&observations, &path)?;
    Ok(path)
}

/// Run every stage in order
pub fn run_all(config: &PipelineConfig) -> Result<ModelOutputs> {
    log::info!("{config}");
    let progress = create_stage_progress_bar(TOTAL_STEPS as u64, Some("Running pipeline"));

    log_step(1, TOTAL_STEPS, "Normalizing WDI indicators");
    let wdi = prepare_wdi(config)?;
    progress.inc(1);

    log_step(2, TOTAL_STEPS, "Normalizing SIPRI arms transfers");
    let sipri = prepare_sipri(config)?;
    progress.inc(1);

    log_step(3, TOTAL_STEPS, "Normalizing UCDP conflict terminations");
    let ucdp = prepare_ucdp(config)?;
    progress.inc(1);

    log_step(4, TOTAL_STEPS, "Assembling analysis panel");
    let panel = merge_panel(config, &wdi, &sipri, &ucdp)?;
    progress.inc(1);

    log_step(5, TOTAL_STEPS, "Loading model input");
    let observations = load_model_input(config, Some(panel.as_slice()))?;
    progress.inc(1);

    log_step(6, TOTAL_STEPS, "Fitting logit model and writing reports");
    let outputs = run_model(config, &observations)?;
    progress.inc(1);

    finish_progress_bar(&progress, Some("Pipeline complete"));
    Ok(outputs)
}
