use std::fmt;
use std::sync::Arc;

use sprd_engine::engine::GridBounds;

pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;
pub type Normalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Per-document naming rules and format version.
///
/// Every cell name, whether set directly or referenced from a formula, is
/// passed through `normalize` and must then satisfy `is_valid`. `version` is
/// written into saved documents and must match when loading.
#[derive(Clone)]
pub struct Rules {
    is_valid: Validator,
    normalize: Normalizer,
    version: String,
}

impl Rules {
    /// Accept every legal name unchanged, version `"default"`.
    pub fn new() -> Self {
        Rules {
            is_valid: Arc::new(|_: &str| true),
            normalize: Arc::new(|name: &str| name.to_string()),
            version: "default".to_string(),
        }
    }

    pub fn with_validator<F>(mut self, is_valid: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.is_valid = Arc::new(is_valid);
        self
    }

    pub fn with_normalizer<F>(mut self, normalize: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.normalize = Arc::new(normalize);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Upper-case names and only accept `A1` names inside `bounds`.
    pub fn grid(bounds: GridBounds) -> Self {
        Rules::new()
            .with_normalizer(|name| name.to_uppercase())
            .with_validator(move |name| bounds.contains(name))
    }

    pub fn is_valid(&self, name: &str) -> bool {
        (self.is_valid)(name)
    }

    pub fn normalize(&self, name: &str) -> String {
        (self.normalize)(name)
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::new()
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = Rules::default();
        assert!(rules.is_valid("anything"));
        assert_eq!(rules.normalize("a1"), "a1");
        assert_eq!(rules.version(), "default");
    }

    #[test]
    fn test_grid_rules() {
        let rules = Rules::grid(GridBounds::new(2, 5)).with_version("v2");
        assert_eq!(rules.normalize("b3"), "B3");
        assert!(rules.is_valid("B5"));
        assert!(!rules.is_valid("C1"));
        assert_eq!(rules.version(), "v2");
    }
}
