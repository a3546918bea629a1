//! Error handling for the arms-recurrence pipeline.
//!
//! Every failure is fatal to the run. Errors raised by a transform carry the
//! [`Stage`] they came from so the message identifies where the run halted.

pub mod util;

use std::fmt;
use std::io;
use std::path::Path;

use arrow::error::ArrowError;

/// Pipeline stage an error originated in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// World Bank WDI normalizer
    WdiNormalizer,
    /// SIPRI arms-transfer normalizer
    SipriNormalizer,
    /// UCDP termination normalizer
    UcdpNormalizer,
    /// Inner join of the normalized tables
    PanelAssembler,
    /// Lag construction and listwise deletion
    FeatureBuilder,
    /// Logistic regression
    ModelFitter,
    /// Tables, text reports and plots
    Reporter,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WdiNormalizer => "WDI normalizer",
            Self::SipriNormalizer => "SIPRI normalizer",
            Self::UcdpNormalizer => "UCDP normalizer",
            Self::PanelAssembler => "panel assembler",
            Self::FeatureBuilder => "feature builder",
            Self::ModelFitter => "model fitter",
            Self::Reporter => "reporter",
        };
        f.write_str(name)
    }
}

/// Specialized error type for the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Error opening, reading or writing a file
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Error reading or writing delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error building or writing Arrow tables
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error converting records to or from Arrow
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed or absent column, header or value
    #[error("Parse error in {stage}: {message}")]
    Parse { stage: Stage, message: String },

    /// Invalid numeric domain, such as the log of a non-positive value
    #[error("Domain error in {stage}: {message}")]
    Domain { stage: Stage, message: String },

    /// A guarantee of an earlier stage does not hold
    #[error("Data invariant violated in {stage}: {message}")]
    DataInvariant { stage: Stage, message: String },

    /// Estimation failure
    #[error("Model error: {0}")]
    Model(String),

    /// Rendering failure
    #[error("Plot error: {0}")]
    Plot(String),

    /// Unreadable or invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Create an IO error with context about the file involved
    pub fn io(context: impl Into<String>, path: &Path, source: io::Error) -> Self {
        Self::Io {
            context: format!("{} ({})", context.into(), path.display()),
            source,
        }
    }

    /// Create a parse error for a stage
    pub fn parse(stage: Stage, message: impl Into<String>) -> Self {
        Self::Parse {
            stage,
            message: message.into(),
        }
    }

    /// Create a domain error for a stage
    pub fn domain(stage: Stage, message: impl Into<String>) -> Self {
        Self::Domain {
            stage,
            message: message.into(),
        }
    }

    /// Create a data invariant violation for a stage
    pub fn invariant(stage: Stage, message: impl Into<String>) -> Self {
        Self::DataInvariant {
            stage,
            message: message.into(),
        }
    }

    /// Create a serialization error from any displayable cause
    pub fn serialization(cause: impl fmt::Display) -> Self {
        Self::Serialization(cause.to_string())
    }

    /// Create a plotting error from any displayable cause
    pub fn plot(cause: impl fmt::Display) -> Self {
        Self::Plot(cause.to_string())
    }

    /// Stage the error was raised in, when it is tied to one
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Parse { stage, .. }
            | Self::Domain { stage, .. }
            | Self::DataInvariant { stage, .. } => Some(*stage),
            Self::Model(_) => Some(Stage::ModelFitter),
            Self::Plot(_) => Some(Stage::Reporter),
            _ => None,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
