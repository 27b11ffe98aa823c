//! JSON config file formats

use serde::Deserialize;
use serde_json::Value;

use crate::errors::DeployError;

/// Keys that mark a flat, single-target config file
const FLAT_KEYS: [&str; 3] = ["C_API_KEY", "PROJECT_ID", "EXTENSION_PATH"];

/// Settings for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectEntry {
    /// API key; falls back to the environment when absent
    #[serde(rename = "C_API_KEY", default)]
    pub api_key: Option<String>,

    /// Platform project id
    #[serde(rename = "PROJECT_ID", default)]
    pub project_id: Option<String>,

    /// Explicit artifact path (flat files only)
    #[serde(rename = "EXTENSION_PATH", default)]
    pub extension_path: Option<String>,
}

/// A parsed config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigFile {
    /// `{C_API_KEY, PROJECT_ID, EXTENSION_PATH?}`
    Single(ProjectEntry),

    /// `{"<label>": {C_API_KEY?, PROJECT_ID}, ...}` in file order
    Projects(Vec<(String, ProjectEntry)>),
}

impl ConfigFile {
    /// Interpret a JSON document as one of the supported layouts
    pub fn from_value(value: Value) -> Result<Self, DeployError> {
        let Value::Object(map) = value else {
            return Err(DeployError::ConfigError(
                "Config file must contain a JSON object".to_string(),
            ));
        };

        if map.is_empty() {
            return Err(DeployError::ConfigError(
                "Config file does not define any project".to_string(),
            ));
        }

        if FLAT_KEYS.iter().any(|key| map.contains_key(*key)) {
            let entry = serde_json::from_value(Value::Object(map))?;
            return Ok(ConfigFile::Single(entry));
        }

        let mut projects = Vec::with_capacity(map.len());
        for (label, entry) in map {
            if !entry.is_object() {
                return Err(DeployError::ConfigError(format!(
                    "Project {} must be a JSON object",
                    label
                )));
            }
            let entry: ProjectEntry = serde_json::from_value(entry)?;
            projects.push((label, entry));
        }
        Ok(ConfigFile::Projects(projects))
    }
}
