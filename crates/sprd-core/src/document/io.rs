use super::{Rules, Spreadsheet};
use crate::error::{Result, SpreadsheetError};
use crate::storage::{SprdFile, StoredCell, parse_sprd, read_sprd_version, write_sprd};
use std::path::Path;
use tracing::{info, warn};

impl Spreadsheet {
    /// Load a saved document.
    ///
    /// The file's version must equal `rules.version()`. Every stored cell is
    /// replayed through [`Spreadsheet::set_contents_of_cell`], so the loaded
    /// document is validated and wired up exactly as if it had been typed in.
    /// Any failure, including a cell the rules reject, is a read/write error.
    pub fn open(path: &Path, rules: Rules) -> Result<Spreadsheet> {
        let file = parse_sprd(path).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to read spreadsheet");
        })?;

        if file.version != rules.version() {
            return Err(SpreadsheetError::ReadWrite(format!(
                "version mismatch: {} has version {:?}, expected {:?}",
                path.display(),
                file.version,
                rules.version()
            )));
        }

        let mut sheet = Spreadsheet::with_rules(rules);
        for (name, stored) in &file.cells {
            sheet
                .set_contents_of_cell(name, &stored.string_form)
                .map_err(|e| SpreadsheetError::ReadWrite(format!("cell {}: {}", name, e)))?;
        }
        sheet.changed = false;

        info!(path = %path.display(), cells = file.cells.len(), "loaded spreadsheet");
        Ok(sheet)
    }

    /// Save to `path` and clear the changed flag.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let file = self.to_sprd_file();
        write_sprd(path, &file).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to save spreadsheet");
        })?;
        self.changed = false;

        info!(path = %path.display(), cells = file.cells.len(), "saved spreadsheet");
        Ok(())
    }

    /// Version tag of a saved document, without loading its cells.
    pub fn saved_version(path: &Path) -> Result<String> {
        read_sprd_version(path)
    }

    /// Snapshot of every non-empty cell's string form.
    pub fn to_sprd_file(&self) -> SprdFile {
        let cells = self
            .cells
            .iter()
            .filter(|entry| !entry.value().contents.is_empty())
            .map(|entry| {
                let stored = StoredCell {
                    string_form: entry.value().string_form(),
                };
                (entry.key().clone(), stored)
            })
            .collect();

        SprdFile {
            cells,
            version: self.rules.version().to_string(),
        }
    }
}
