use dashmap::DashMap;
use sprd_engine::engine::{Cell, DependencyGraph};

use super::Rules;

/// UI-agnostic spreadsheet document.
///
/// Owns the cell map and the dependency graph and keeps them in step: after
/// any successful edit every cell that depends on the edited one holds an
/// up-to-date value. Mutations expect a single caller at a time.
#[derive(Debug)]
pub struct Spreadsheet {
    /// Normalized cell name -> contents and value.
    pub(crate) cells: DashMap<String, Cell>,
    /// "t depends on s" pairs between normalized cell names.
    pub(crate) graph: DependencyGraph,
    /// Naming rules and format version, fixed for the document's lifetime.
    pub(crate) rules: Rules,
    /// Whether the document changed since it was created, saved or loaded.
    pub(crate) changed: bool,
}

impl Spreadsheet {
    /// Create an empty spreadsheet with the default rules.
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Create an empty spreadsheet.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn with_rules(rules: Rules) -> Self {
        Spreadsheet {
            cells: DashMap::new(),
            graph: DependencyGraph::new(),
            rules,
            changed: false,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn version(&self) -> &str {
        self.rules.version()
    }

    /// True if the document was modified since it was created, saved or loaded.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}
