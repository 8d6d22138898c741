//! Error types for sprd core.

use sprd_engine::engine::FormulaFormatError;
use thiserror::Error;

/// Errors returned by spreadsheet operations.
///
/// Evaluation problems (division by zero, unbound variables) are not errors
/// here; they become the cell's value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpreadsheetError {
    #[error("invalid cell name: {0:?}")]
    InvalidName(String),

    #[error("formula format error: {0}")]
    FormulaFormat(#[from] FormulaFormatError),

    #[error("contents {0:?} would not read back the same after saving")]
    InvalidContents(String),

    #[error("circular dependency detected at {0}")]
    Circular(String),

    #[error("read/write error: {0}")]
    ReadWrite(String),
}

impl From<std::io::Error> for SpreadsheetError {
    fn from(err: std::io::Error) -> Self {
        SpreadsheetError::ReadWrite(err.to_string())
    }
}

impl From<serde_json::Error> for SpreadsheetError {
    fn from(err: serde_json::Error) -> Self {
        SpreadsheetError::ReadWrite(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpreadsheetError>;
