//! Configuration for the arms-recurrence pipeline.
//!
//! Every file location used by a stage is resolved through
//! [`PipelineConfig`], so tests and alternative runs can substitute their own
//! directories and file names. The defaults reproduce the fixed names of the
//! research scripts in the current directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_bytes;
use crate::error::{PipelineError, Result};

/// Output file names
pub mod outputs {
    pub const WDI_PREPARED: &str = "WDI_prepared.csv";
    pub const SIPRI_PREPARED: &str = "SIPRI_prepared.csv";
    pub const UCDP_PREPARED: &str = "UCDP_prepared.csv";
    pub const ANALYSIS_PANEL: &str = "analysis_panel.csv";
    pub const LOGIT_RESULTS: &str = "logit_results.csv";
    pub const MARGINAL_EFFECTS: &str = "marginal_effects.csv";
    pub const DESCRIPTIVE_STATS: &str = "descriptive_stats.txt";
    pub const MARGINAL_EFFECTS_BARPLOT: &str = "marginal_effects_barplot.png";
    pub const COEF_PLOT: &str = "coef_plot.png";
    pub const TIV_DISTRIBUTION: &str = "tiv_distribution_by_recurrence.png";

    /// File name of the predicted-probability curve for one variable
    #[must_use]
    pub fn marginal_effect_curve(variable: &str) -> String {
        format!("marginal_effect_{variable}.png")
    }
}

/// Where the model fitter takes its observations from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    /// A pre-built modeling dataset relative to the data directory
    File(PathBuf),
    /// The panel assembled in the same run
    Panel,
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::File(PathBuf::from("synthbs.csv"))
    }
}

/// Settings for the Newton-Raphson logit fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogitConfig {
    /// Maximum number of Newton iterations
    pub max_iter: usize,
    /// Convergence threshold on the largest absolute parameter step
    pub tolerance: f64,
}

impl Default for LogitConfig {
    fn default() -> Self {
        Self {
            max_iter: 35,
            tolerance: 1e-8,
        }
    }
}

/// Settings for rendered figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of evenly spaced points on each predicted-probability curve
    pub curve_points: usize,
    /// Render the PNG figures; tables and text reports are always written
    pub render: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            curve_points: 100,
            render: true,
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory the raw extracts are read from
    pub data_dir: PathBuf,
    /// Directory every output is written to
    pub output_dir: PathBuf,
    /// Wide WDI indicator export
    pub wdi_file: PathBuf,
    /// SIPRI trade register export
    pub sipri_file: PathBuf,
    /// UCDP conflict termination records
    pub ucdp_file: PathBuf,
    /// Number of preamble lines preceding the SIPRI header
    pub sipri_preamble_lines: usize,
    /// Observations the model is fitted on
    pub model_source: ModelSource,
    /// Logit fitting settings
    pub logit: LogitConfig,
    /// Figure settings
    pub plot: PlotConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            wdi_file: PathBuf::from("WDI.csv"),
            sipri_file: PathBuf::from("SIPRI.csv"),
            ucdp_file: PathBuf::from("ucpd-termination.csv"),
            sipri_preamble_lines: 10,
            model_source: ModelSource::default(),
            logit: LogitConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Configuration reading from `data_dir` and writing to `output_dir`
    #[must_use]
    pub fn with_dirs(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = safe_read_bytes(path, "pipeline configuration")?;
        serde_json::from_slice(&bytes)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))
    }

    /// Load the configuration named by the first command-line argument, or the defaults
    pub fn from_args() -> Result<Self> {
        match std::env::args_os().nth(1) {
            Some(path) => Self::from_json_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Resolve an input file against the data directory
    #[must_use]
    pub fn input_path(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Resolve an output file against the output directory
    #[must_use]
    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    #[must_use]
    pub fn wdi_path(&self) -> PathBuf {
        self.input_path(&self.wdi_file)
    }

    #[must_use]
    pub fn sipri_path(&self) -> PathBuf {
        self.input_path(&self.sipri_file)
    }

    #[must_use]
    pub fn ucdp_path(&self) -> PathBuf {
        self.input_path(&self.ucdp_file)
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Data Directory: {}", self.data_dir.display())?;
        writeln!(f, "  Output Directory: {}", self.output_dir.display())?;
        writeln!(f, "  WDI Extract: {}", self.wdi_file.display())?;
        writeln!(
            f,
            "  SIPRI Extract: {} ({} preamble lines)",
            self.sipri_file.display(),
            self.sipri_preamble_lines
        )?;
        writeln!(f, "  UCDP Extract: {}", self.ucdp_file.display())?;
        match &self.model_source {
            ModelSource::File(path) => writeln!(f, "  Model Input: {}", path.display())?,
            ModelSource::Panel => writeln!(f, "  Model Input: assembled panel")?,
        }
        writeln!(
            f,
            "  Logit: max {} iterations, tolerance {:e}",
            self.logit.max_iter, self.logit.tolerance
        )?;
        Ok(())
    }
}
