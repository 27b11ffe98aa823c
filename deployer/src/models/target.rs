//! Deployment target models

use secrecy::{ExposeSecret, SecretString};

use crate::errors::DeployError;

/// One (project, credential) pair the artifact is deployed to
#[derive(Debug)]
pub struct Target {
    /// Project label from the config file, or the project id
    pub name: String,

    /// Platform project id
    pub project_id: String,

    api_key: SecretString,
}

impl Target {
    /// Create a target, rejecting empty credentials
    pub fn new(
        name: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, DeployError> {
        let name = name.into();
        let project_id = project_id.into();
        let api_key = api_key.into();

        if project_id.trim().is_empty() {
            return Err(DeployError::ConfigError(format!(
                "PROJECT_ID is missing for project {}",
                name
            )));
        }
        if api_key.trim().is_empty() {
            return Err(DeployError::ConfigError(format!(
                "API key is missing for project {}",
                name
            )));
        }

        Ok(Self {
            name,
            project_id,
            api_key: SecretString::from(api_key),
        })
    }

    /// API key sent in the `X-API-Key` header
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Whether an extension is created or updated in a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update { extension_id: String },
}

impl SubmitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitMode::Create => "create",
            SubmitMode::Update { .. } => "update",
        }
    }
}
