//! Cell data structures.
//!
//! - [`CellContents`] - what the user entered: text, a number or a formula
//! - [`CellValue`] - what the cell shows: text, a number or an evaluation error
//! - [`Cell`] - contents and the value derived from them

use std::fmt;

use super::eval::FormulaError;
use super::formula::{Formula, FormulaFormatError};

/// The raw contents of a cell. Empty text means the cell is empty.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContents {
    Text(String),
    Number(f64),
    Formula(Formula),
}

impl CellContents {
    /// Classify user input.
    /// - Parses as a finite number (surrounding whitespace allowed) -> Number
    /// - Starts with '=' -> Formula built from the rest of the input
    /// - Otherwise -> Text, kept verbatim
    pub fn parse<N, V>(
        input: &str,
        normalize: N,
        is_valid: V,
    ) -> Result<CellContents, FormulaFormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        if let Some(n) = parse_number(input) {
            return Ok(CellContents::Number(n));
        }

        if let Some(formula) = input.strip_prefix('=') {
            return Formula::with_rules(formula, normalize, is_valid).map(CellContents::Formula);
        }

        Ok(CellContents::Text(input.to_string()))
    }

    /// True if `input` would be classified as text by [`CellContents::parse`].
    pub fn is_plain_text(input: &str) -> bool {
        parse_number(input).is_none() && !input.starts_with('=')
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContents::Text(s) if s.is_empty())
    }

    /// The text that reproduces these contents when parsed again.
    pub fn string_form(&self) -> String {
        match self {
            CellContents::Text(s) => s.clone(),
            CellContents::Number(n) => n.to_string(),
            CellContents::Formula(f) => format!("={}", f),
        }
    }

    /// Variables the contents read from. Only formulas have any.
    pub fn variables(&self) -> Vec<String> {
        match self {
            CellContents::Formula(f) => f.variables().map(str::to_string).collect(),
            CellContents::Text(_) | CellContents::Number(_) => Vec::new(),
        }
    }
}

fn parse_number(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Default for CellContents {
    fn default() -> Self {
        CellContents::Text(String::new())
    }
}

impl fmt::Display for CellContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_form())
    }
}

/// The derived value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) | CellValue::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl From<Result<f64, FormulaError>> for CellValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

/// A named cell's contents together with its current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub contents: CellContents,
    pub value: CellValue,
}

impl Cell {
    /// Build a cell whose value can be read straight off its contents.
    /// Formula cells start out with a placeholder error until evaluated.
    pub fn new(contents: CellContents) -> Cell {
        let value = match &contents {
            CellContents::Text(s) => CellValue::Text(s.clone()),
            CellContents::Number(n) => CellValue::Number(*n),
            CellContents::Formula(_) => CellValue::Error(FormulaError::new("not yet evaluated")),
        };
        Cell { contents, value }
    }

    pub fn formula(&self) -> Option<&Formula> {
        match &self.contents {
            CellContents::Formula(f) => Some(f),
            CellContents::Text(_) | CellContents::Number(_) => None,
        }
    }

    pub fn string_form(&self) -> String {
        self.contents.string_form()
    }
}
