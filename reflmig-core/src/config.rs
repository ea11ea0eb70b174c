//! Configuration loading from reflmig.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{IoResultExt, ReflmigError, ReflmigResult};
use crate::rules::RewriteRules;

/// File name looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "reflmig.toml";

/// Main configuration structure for reflmig.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ReflmigConfig {
    /// Headers to migrate, replacing the built-in table.
    pub targets: Option<Vec<String>>,
    /// Headers never to touch, replacing the built-in table.
    pub exclude: Option<Vec<String>>,
    /// Macro names, any field may be omitted.
    pub macros: Option<RewriteRules>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl ReflmigConfig {
    /// True if the config asks for JSON output.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from reflmig.toml at `root` if it exists.
pub fn load_config(root: &Path) -> ReflmigResult<Option<ReflmigConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Loads and validates configuration from an explicit path.
pub fn load_config_from(path: &Path) -> ReflmigResult<ReflmigConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    let cfg: ReflmigConfig =
        toml::from_str(&content).map_err(|e| ReflmigError::config(path, e.to_string()))?;

    if let Some(rules) = &cfg.macros {
        rules
            .validate()
            .map_err(|e| ReflmigError::config(path, e.to_string()))?;
    }

    if let Some(format) = cfg.output.as_ref().and_then(|o| o.format.as_deref()) {
        if !matches!(format.to_ascii_lowercase().as_str(), "plain" | "json") {
            return Err(ReflmigError::config(
                path,
                format!("output.format must be \"plain\" or \"json\", got {:?}", format),
            ));
        }
    }

    Ok(cfg)
}
