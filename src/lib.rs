//! QSVM prep - подготовка табличных данных для квантового SVM

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod types;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use models::*;
pub use pipeline::{Pipeline, PipelineReport, PreparedData};
pub use types::*;
