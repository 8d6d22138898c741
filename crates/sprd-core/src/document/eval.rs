use super::Spreadsheet;
use sprd_engine::engine::CellValue;
use tracing::{debug_span, trace};

impl Spreadsheet {
    /// Re-evaluate the formula cells in `order`, front to back.
    ///
    /// `order` must list every cell after the cells it reads from, so each
    /// formula sees values that are already up to date. Text and number cells
    /// are skipped; their value is their contents.
    pub(crate) fn recalculate(&self, order: &[String]) {
        let _span = debug_span!("recalculate", cells = order.len()).entered();

        for name in order {
            let Some(formula) = self.cells.get(name).and_then(|cell| cell.formula().cloned()) else {
                continue;
            };

            let value = CellValue::from(formula.evaluate(|var| self.lookup(var)));
            trace!(cell = %name, ?value, "re-evaluated");

            if let Some(mut cell) = self.cells.get_mut(name) {
                cell.value = value;
            }
        }
    }

    /// Numeric value of a referenced cell, for formula evaluation.
    pub(crate) fn lookup(&self, name: &str) -> Result<f64, String> {
        let Some(cell) = self.cells.get(name) else {
            return Err(format!("cell {} is empty", name));
        };
        match &cell.value {
            CellValue::Number(n) => Ok(*n),
            CellValue::Text(s) if s.is_empty() => Err(format!("cell {} is empty", name)),
            CellValue::Text(_) => Err(format!("cell {} does not contain a number", name)),
            CellValue::Error(e) => Err(format!("cell {} has an error: {}", name, e)),
        }
    }
}
