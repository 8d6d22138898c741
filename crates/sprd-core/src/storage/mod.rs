//! Storage backends for spreadsheet documents.
//!
//! A `.sprd` document is JSON with two top-level fields:
//!
//! ```text
//! {
//!   "Cells": { "A1": { "StringForm": "5" }, "B1": { "StringForm": "=A1*2" } },
//!   "Version": "default"
//! }
//! ```
//!
//! Only the string form of each cell is stored. Formulas, dependencies and
//! values are rebuilt by replaying those strings through the normal edit path.

pub mod parser;
pub mod writer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use parser::{parse_sprd, parse_sprd_content, read_sprd_version};
pub use writer::{write_sprd, write_sprd_content};

/// Default file extension for saved documents.
pub const FILE_EXTENSION: &str = "sprd";

/// On-disk shape of a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SprdFile {
    pub cells: BTreeMap<String, StoredCell>,
    pub version: String,
}

/// On-disk shape of one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredCell {
    pub string_form: String,
}
