//! Spreadsheet engine API.
//!
//! This module provides the computation side of the spreadsheet:
//!
//! - [`Formula`] - Validated infix formulas with canonical rendering
//! - [`tokenize`], [`Token`] - Formula tokens
//! - [`Formula::evaluate`], [`FormulaError`] - Evaluation against a variable lookup
//! - [`DependencyGraph`] - Mirrored dependents/dependees relation
//! - [`cells_to_recalculate`] - Recalculation order and cycle detection
//! - [`Cell`], [`CellContents`], [`CellValue`] - Cell data structures
//! - [`CellRef`], [`GridBounds`] - `A1` names and grid-restricted validity
//! - [`format_value`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod eval;
mod format;
mod formula;
mod token;

pub use cell::{Cell, CellContents, CellValue};
pub use cell_ref::{CellRef, GridBounds};
pub use cycle::{RecalcError, cells_to_recalculate};
pub use deps::DependencyGraph;
pub use eval::FormulaError;
pub use format::{format_number, format_value};
pub use formula::{Formula, FormulaFormatError};
pub use token::{Operator, Token, is_variable, tokenize};
