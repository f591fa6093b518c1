//! Ошибки конвейера предобработки

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Источник недоступен или данные повреждены
    #[error("failed to load data from {source_name}: {message}")]
    Load { source_name: String, message: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("missing columns after encoding: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("missing value in row {row}, column {column}")]
    MissingValue { row: usize, column: String },

    #[error("row {row} does not match any declared class")]
    Unlabeled { row: usize },

    #[error("no data: {0}")]
    NoData(String),

    /// Нулевая дисперсия признака на обучающей выборке
    #[error("feature '{column}' has zero variance on training data")]
    DegenerateFeature { column: String },

    #[error("non-finite value produced by {stage}")]
    NonFinite { stage: &'static str },

    #[error("{0} not fitted")]
    NotFitted(&'static str),

    #[error("classifier '{name}' failed: {message}")]
    Classifier { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
