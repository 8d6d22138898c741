//! sprd-core - UI-agnostic spreadsheet document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Rules, Spreadsheet};
pub use error::{Result, SpreadsheetError};
pub use storage::FILE_EXTENSION;

pub use sprd_engine::engine::{
    Cell, CellContents, CellValue, Formula, FormulaError, FormulaFormatError, GridBounds,
};
