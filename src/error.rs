//! Error types.
//!
//! `AppError` is the binary-level error: a message plus the process exit code.
//! The typed errors below are raised by the pipeline stages and converted into
//! `AppError` only where they are fatal to the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Invalid city profile or generation settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("city '{city}': noise bound must be >= 0, got {noise}")]
    NegativeNoise { city: String, noise: i64 },

    #[error("city '{city}': base and step must be finite")]
    NonFinite { city: String },

    #[error("city profile has an empty name")]
    EmptyName,

    #[error("duplicate city '{0}' in profile set")]
    DuplicateCity(String),

    #[error("series length must be > 0")]
    ZeroLength,
}

/// A series that no candidate ARIMA order could be fitted to.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelFitError {
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("series contains non-finite values")]
    NonFinite,

    #[error("series is constant at {value}; nothing to fit")]
    ConstantSeries { value: f64 },

    #[error("no admissible ARIMA order among {tried} candidates")]
    NoAdmissibleModel { tried: usize },
}

/// The trailing-actual total used as the growth baseline is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("trailing actual total is zero; growth is undefined")]
pub struct DivideByZeroError;

/// Failure to write or read back an exported file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error on '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("workbook error on '{}': {source}", path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Chart rendering failure. Never fatal to the run.
#[derive(Debug, Error)]
#[error("failed to render chart '{}': {message}", path.display())]
pub struct ChartError {
    pub path: PathBuf,
    pub message: String,
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::new(2, format!("Invalid city configuration: {err}"))
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::new(3, format!("Export failed: {err}"))
    }
}
