//! CLI configuration (`config.toml`).
//!
//! ```toml
//! version = "1.0"
//! upper_case_names = true
//!
//! [grid]
//! columns = 26
//! rows = 99
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use sprd_core::{GridBounds, Rules};
use std::path::PathBuf;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Version tag written to and required from documents.
    pub version: Option<String>,
    /// Upper-case cell names before use (default: true).
    pub upper_case_names: Option<bool>,
    /// Restrict cell names to an `A1`-style grid.
    pub grid: Option<GridBounds>,
}

impl Config {
    pub fn rules(&self) -> Rules {
        let mut rules = match self.grid {
            Some(bounds) => Rules::new().with_validator(move |name| bounds.contains(name)),
            None => Rules::new(),
        };
        if self.upper_case_names.unwrap_or(true) {
            rules = rules.with_normalizer(|name| name.to_uppercase());
        }
        if let Some(version) = &self.version {
            rules = rules.with_version(version.clone());
        }
        rules
    }
}

/// Load the config from `config_file`, or from the user config dir.
/// Problems are returned as warnings and the defaults are used instead.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };
    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file {} not found", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            None
        }
    };

    (config.unwrap_or_default(), warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sprd")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
