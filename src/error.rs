//! Error types for training, artifact handling and prediction.
//!
//! Each stage owns its own enum. [`PredictError`] is the user-facing taxonomy
//! rendered by the form: every variant maps to one visible message.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the training dataset. Always fatal before fitting.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required column is absent from the header.
    #[error("missing column `{column}` in dataset header")]
    MissingColumn { column: String },
    /// A required column appears more than once in the header.
    #[error("duplicate column `{column}` in dataset header")]
    DuplicateColumn { column: String },
    /// A cell could not be parsed as the column's type.
    #[error("malformed value {value:?} in column `{column}` at row {row}")]
    Malformed {
        row: usize,
        column: String,
        value: String,
    },
    /// A categorical cell is not in the encoding table.
    #[error("unknown category {value:?} in column `{column}` at row {row}")]
    UnknownCategory {
        row: usize,
        column: String,
        value: String,
    },
    /// Rows of differing width or x/y length mismatch.
    #[error("inconsistent shape: {0}")]
    Shape(String),
    /// No data rows.
    #[error("dataset is empty")]
    Empty,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by model fitting and inference.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("feature mismatch: expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },
    #[error("non-finite input value at feature {index}")]
    NonFiniteInput { index: usize },
    #[error("model produced a non-finite output")]
    NonFiniteOutput,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("empty data: {0}")]
    EmptyData(String),
    /// Deserialized parameters do not describe a valid model.
    #[error("corrupt model parameters: {0}")]
    CorruptParams(String),
}

/// Errors reading or writing a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {}", path.display())]
    Missing { path: PathBuf },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("not a model artifact (bad magic bytes)")]
    BadMagic,
    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    /// The artifact was trained with a different category table.
    #[error("artifact encoding table does not match this build (artifact v{found}, build v{expected})")]
    EncodingMismatch { found: u32, expected: u32 },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// User-facing prediction failures.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model file not found at {}; run the trainer first", path.display())]
    ArtifactMissing { path: PathBuf },
    #[error("model could not be loaded: {0}")]
    Artifact(ArtifactError),
    #[error("error during prediction: {0}")]
    Inference(#[from] ModelError),
    /// The model answered, but with a value that cannot be a cost.
    #[error("error calculating the amount")]
    NegativeResult { value: f64 },
    #[error("predictor is halted: the model is unavailable")]
    Halted,
    #[error("no inputs collected")]
    NotReady,
}

impl From<ArtifactError> for PredictError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Missing { path } => PredictError::ArtifactMissing { path },
            other => PredictError::Artifact(other),
        }
    }
}

/// Errors from a training run.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
