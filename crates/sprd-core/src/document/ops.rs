use super::Spreadsheet;
use crate::error::{Result, SpreadsheetError};
use sprd_engine::engine::{
    Cell, CellContents, CellValue, Formula, FormulaFormatError, RecalcError, cells_to_recalculate,
    is_variable,
};
use tracing::{debug, warn};

impl Spreadsheet {
    /// Check `name` and return its normalized form.
    ///
    /// Both the name as given and its normalized form must be legal variable
    /// names, and the normalized form must pass the document's validator.
    pub(crate) fn normalize_name(&self, name: &str) -> Result<String> {
        if !is_variable(name) {
            return Err(SpreadsheetError::InvalidName(name.to_string()));
        }
        let normalized = self.rules.normalize(name);
        if !is_variable(&normalized) || !self.rules.is_valid(&normalized) {
            return Err(SpreadsheetError::InvalidName(name.to_string()));
        }
        Ok(normalized)
    }

    /// Set a cell from raw input text.
    ///
    /// Text that parses as a number becomes a number, text starting with `=`
    /// becomes a formula, anything else is stored as text. The empty string
    /// empties the cell.
    ///
    /// Returns the edited cell followed by every cell that depends on it,
    /// directly or indirectly, in an order where each cell comes after the
    /// cells it reads from. On error nothing is changed.
    pub fn set_contents_of_cell(&mut self, name: &str, content: &str) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        let rules = &self.rules;
        let contents = CellContents::parse(
            content,
            |var| rules.normalize(var),
            |var| rules.is_valid(var),
        )?;
        self.apply_contents(name, contents)
    }

    /// Set a cell to a number. Only finite numbers can be stored.
    pub fn set_cell_number(&mut self, name: &str, number: f64) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        if !number.is_finite() {
            return Err(SpreadsheetError::InvalidContents(number.to_string()));
        }
        self.apply_contents(name, CellContents::Number(number))
    }

    /// Set a cell to text.
    ///
    /// Text that would be read as a number or a formula when the document is
    /// loaded again, such as `"5"` or `"=x"`, is rejected.
    pub fn set_cell_text(&mut self, name: &str, text: &str) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        if !CellContents::is_plain_text(text) {
            return Err(SpreadsheetError::InvalidContents(text.to_string()));
        }
        self.apply_contents(name, CellContents::Text(text.to_string()))
    }

    /// Set a cell to an already-parsed formula.
    ///
    /// The formula's variables must already be normalized under this
    /// document's rules and accepted by its validator.
    pub fn set_cell_formula(&mut self, name: &str, formula: Formula) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        for var in formula.variables() {
            if self.rules.normalize(var) != var || !self.rules.is_valid(var) {
                return Err(FormulaFormatError::InvalidVariable(var.to_string()).into());
            }
        }
        self.apply_contents(name, CellContents::Formula(formula))
    }

    /// Swap in new contents for `name`, rewire its dependees and recompute
    /// everything downstream. Rolls the graph back if the edit closes a cycle.
    fn apply_contents(&mut self, name: String, contents: CellContents) -> Result<Vec<String>> {
        let previous: Vec<String> = self.graph.dependees(&name).map(str::to_string).collect();
        self.graph.replace_dependees(&name, contents.variables());

        let order = match cells_to_recalculate(&self.graph, &name) {
            Ok(order) => order,
            Err(RecalcError::Circular { cell }) => {
                self.graph.replace_dependees(&name, &previous);
                warn!(cell = %cell, "rejected edit: circular dependency");
                return Err(SpreadsheetError::Circular(cell));
            }
        };

        // An empty cell reads the same as a missing one.
        if contents.is_empty() {
            self.cells.remove(&name);
        } else {
            self.cells.insert(name.clone(), Cell::new(contents));
        }
        self.recalculate(&order);
        self.changed = true;

        debug!(cell = %name, affected = order.len(), "cell contents changed");
        Ok(order)
    }

    /// Contents of a cell, or empty text if it was never set.
    pub fn cell_contents(&self, name: &str) -> Result<CellContents> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.contents.clone())
            .unwrap_or_default())
    }

    /// Value of a cell, or empty text if it was never set.
    pub fn cell_value(&self, name: &str) -> Result<CellValue> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.value.clone())
            .unwrap_or_default())
    }

    /// The text a cell is saved as: a number's text, the literal text, or
    /// `=` followed by the canonical formula.
    pub fn cell_string_form(&self, name: &str) -> Result<String> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.string_form())
            .unwrap_or_default())
    }

    /// Names of all cells whose contents are not empty, in no particular order.
    pub fn nonempty_cell_names(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .iter()
            .filter(|entry| !entry.value().contents.is_empty())
            .map(|entry| entry.key().clone())
    }

    /// Cells whose formulas read `name` directly.
    pub fn direct_dependents(&self, name: &str) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        Ok(self.graph.dependents(&name).map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Rules;
    use sprd_engine::engine::GridBounds;

    #[test]
    fn test_invalid_names_rejected() {
        let mut sheet = Spreadsheet::new();
        for bad in ["", "1A", "A-1", "A 1", "$A1"] {
            assert_eq!(
                sheet.set_contents_of_cell(bad, "1"),
                Err(SpreadsheetError::InvalidName(bad.to_string()))
            );
            assert!(sheet.cell_contents(bad).is_err());
            assert!(sheet.cell_value(bad).is_err());
        }
        assert!(!sheet.changed());
    }

    #[test]
    fn test_validator_and_normalizer_apply_to_names() {
        let mut sheet = Spreadsheet::with_rules(Rules::grid(GridBounds::new(3, 3)));
        sheet.set_contents_of_cell("a1", "4").unwrap();
        assert_eq!(sheet.cell_value("A1").unwrap(), CellValue::Number(4.0));
        assert_eq!(sheet.cell_contents("a1").unwrap(), CellContents::Number(4.0));
        assert!(matches!(
            sheet.set_contents_of_cell("D1", "1"),
            Err(SpreadsheetError::InvalidName(_))
        ));
        assert!(matches!(
            sheet.set_contents_of_cell("B1", "=A1 + z9"),
            Err(SpreadsheetError::FormulaFormat(
                FormulaFormatError::InvalidVariable(_)
            ))
        ));
    }

    #[test]
    fn test_unset_cells_read_as_empty() {
        let sheet = Spreadsheet::new();
        assert_eq!(sheet.cell_contents("Q7").unwrap(), CellContents::Text(String::new()));
        assert_eq!(sheet.cell_value("Q7").unwrap(), CellValue::Text(String::new()));
        assert_eq!(sheet.cell_string_form("Q7").unwrap(), "");
    }

    #[test]
    fn test_typed_setters() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_number("A1", 2.5).unwrap();
        sheet.set_cell_text("A2", "not a formula").unwrap();
        sheet
            .set_cell_formula("A3", Formula::new("A1 * 2").unwrap())
            .unwrap();

        assert_eq!(sheet.cell_value("A3").unwrap(), CellValue::Number(5.0));
        assert_eq!(
            sheet.cell_value("A2").unwrap(),
            CellValue::Text("not a formula".to_string())
        );
    }

    #[test]
    fn test_typed_setters_reject_contents_that_change_on_reload() {
        let mut sheet = Spreadsheet::new();
        for text in ["5", " 2.5 ", "=A1", "=not a formula"] {
            assert_eq!(
                sheet.set_cell_text("A1", text),
                Err(SpreadsheetError::InvalidContents(text.to_string()))
            );
        }
        for number in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert!(matches!(
                sheet.set_cell_number("A2", number),
                Err(SpreadsheetError::InvalidContents(_))
            ));
        }
        assert!(!sheet.changed());
        assert_eq!(sheet.nonempty_cell_names().count(), 0);
    }

    #[test]
    fn test_clearing_cells_does_not_keep_records() {
        let mut sheet = Spreadsheet::new();
        for i in 0..100 {
            sheet.set_contents_of_cell(&format!("X{}", i), "").unwrap();
        }
        assert!(sheet.cells.is_empty());

        sheet.set_contents_of_cell("A1", "3").unwrap();
        sheet.set_contents_of_cell("B1", "=A1 + 1").unwrap();
        let affected = sheet.set_contents_of_cell("A1", "").unwrap();
        assert_eq!(affected, vec!["A1", "B1"]);
        assert_eq!(sheet.cells.len(), 1);
        assert!(sheet.cell_value("B1").unwrap().is_error());
        assert_eq!(sheet.direct_dependents("A1").unwrap(), vec!["B1"]);
    }

    #[test]
    fn test_set_cell_formula_checks_variables_against_rules() {
        let mut sheet = Spreadsheet::with_rules(Rules::grid(GridBounds::default()));
        let lower = Formula::new("a1 + 1").unwrap();
        assert!(matches!(
            sheet.set_cell_formula("B1", lower),
            Err(SpreadsheetError::FormulaFormat(_))
        ));
        let upper = Formula::new("A1 + 1").unwrap();
        assert!(sheet.set_cell_formula("B1", upper).is_ok());
    }

    #[test]
    fn test_nonempty_cell_names() {
        let mut sheet = Spreadsheet::new();
        sheet.set_contents_of_cell("A1", "1").unwrap();
        sheet.set_contents_of_cell("B1", "hello").unwrap();
        sheet.set_contents_of_cell("C1", "=A1").unwrap();
        sheet.set_contents_of_cell("B1", "").unwrap();

        let mut names: Vec<String> = sheet.nonempty_cell_names().collect();
        names.sort();
        assert_eq!(names, vec!["A1", "C1"]);
    }

    #[test]
    fn test_direct_dependents() {
        let mut sheet = Spreadsheet::new();
        sheet.set_contents_of_cell("B1", "=A1").unwrap();
        sheet.set_contents_of_cell("C1", "=A1 + B1").unwrap();
        assert_eq!(sheet.direct_dependents("A1").unwrap(), vec!["B1", "C1"]);
        assert_eq!(sheet.direct_dependents("B1").unwrap(), vec!["C1"]);
        assert!(sheet.direct_dependents("C1").unwrap().is_empty());
    }

    #[test]
    fn test_replacing_formula_drops_old_edges() {
        let mut sheet = Spreadsheet::new();
        sheet.set_contents_of_cell("C1", "=A1 + B1").unwrap();
        sheet.set_contents_of_cell("C1", "=B1").unwrap();
        assert!(sheet.direct_dependents("A1").unwrap().is_empty());

        sheet.set_contents_of_cell("C1", "7").unwrap();
        assert!(sheet.direct_dependents("B1").unwrap().is_empty());
        assert!(sheet.graph.is_empty());
    }
}
