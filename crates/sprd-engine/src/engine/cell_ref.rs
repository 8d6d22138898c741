//! Grid-style cell names.
//!
//! Cell names are free-form variables, but most documents restrict them to a
//! fixed grid such as `A1`..`Z99`. [`CellRef`] converts `A1` notation to
//! zero-indexed coordinates and [`GridBounds`] turns a grid size into a
//! validity predicate for a spreadsheet.
//!
//! ```ignore
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!((cell.col, cell.row), (1, 2));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A cell position (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$")
            .expect("A1 cell reference regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse `A1` notation, case-insensitively. Row numbers are 1-based.
    /// Returns None for anything else, including row 0 and overflow.
    pub fn parse(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(col, row))
    }
}

/// The size of a rectangular grid anchored at `A1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub columns: usize,
    pub rows: usize,
}

impl GridBounds {
    pub fn new(columns: usize, rows: usize) -> GridBounds {
        GridBounds { columns, rows }
    }

    /// True if `name` is in `A1` notation and lies inside the grid.
    pub fn contains(&self, name: &str) -> bool {
        CellRef::parse(name).is_some_and(|cell| cell.col < self.columns && cell.row < self.rows)
    }
}

impl Default for GridBounds {
    /// `A1`..`Z99`.
    fn default() -> Self {
        GridBounds::new(26, 99)
    }
}
