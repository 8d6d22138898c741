//! Parser for the .sprd file format

use super::SprdFile;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const MAX_SPRD_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

fn read_sprd_text(path: &Path) -> Result<String> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_SPRD_FILE_BYTES {
        return Err(crate::error::SpreadsheetError::ReadWrite(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_SPRD_FILE_BYTES
        )));
    }
    Ok(fs::read_to_string(path)?)
}

/// Parse a .sprd file
pub fn parse_sprd(path: &Path) -> Result<SprdFile> {
    let content = read_sprd_text(path)?;
    parse_sprd_content(&content)
}

/// Parse .sprd content from a string
pub fn parse_sprd_content(content: &str) -> Result<SprdFile> {
    Ok(serde_json::from_str(content)?)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VersionOnly {
    version: String,
}

/// Read only the version tag of a .sprd file
pub fn read_sprd_version(path: &Path) -> Result<String> {
    let content = read_sprd_text(path)?;
    let header: VersionOnly = serde_json::from_str(&content)?;
    Ok(header.version)
}
