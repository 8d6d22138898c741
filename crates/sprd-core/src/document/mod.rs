//! Spreadsheet document state and logic (UI-agnostic).

mod eval;
mod io;
mod ops;
mod rules;
mod state;

pub use rules::Rules;
pub use state::Spreadsheet;
