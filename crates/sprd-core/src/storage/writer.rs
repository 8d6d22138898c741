//! Writer for the .sprd file format

use super::SprdFile;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Write a document to a .sprd file
pub fn write_sprd(path: &Path, file: &SprdFile) -> Result<()> {
    let content = write_sprd_content(file)?;
    fs::write(path, content)?;
    Ok(())
}

/// Write a document to a .sprd format string. Cells are sorted by name.
pub fn write_sprd_content(file: &SprdFile) -> Result<String> {
    let mut content = serde_json::to_string_pretty(file)?;
    content.push('\n');
    Ok(content)
}
