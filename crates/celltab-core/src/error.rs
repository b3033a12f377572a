//! Error types for Celltab core.

use thiserror::Error;

use celltab_engine::error::{CycleError, FormulaError};

/// Errors that abort a sheet operation. Every variant leaves the sheet
/// unchanged: formula-evaluation failures are cell *values*, not errors.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("'{0}' is not a valid cell name")]
    InvalidName(String),

    #[error("invalid formula: {0}")]
    Formula(#[from] FormulaError),

    #[error("{0}")]
    Cycle(#[from] CycleError),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, SheetError>;
