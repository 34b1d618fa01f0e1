use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a report run. All variants are fatal: this is a
/// single-shot batch computation with no retries or partial output.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("required column '{column}' missing from header of {}", path.display())]
    MissingColumn { column: &'static str, path: PathBuf },

    #[error("{}, row {row}: cannot parse {column} value '{value}' as a number", path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: csv::Error },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("report rendering failed: {0}")]
    Render(csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
