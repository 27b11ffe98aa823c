//! Turns arguments, environment and config file into deployment targets

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::options::{CliArgs, USAGE};
use crate::artifact::ArtifactSource;
use crate::config::file::{ConfigFile, ProjectEntry};
use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::models::target::Target;

pub const ENV_API_KEY: &str = "C_API_KEY";
pub const ENV_PROJECT_ID: &str = "PROJECT_ID";
pub const ENV_EXTENSION_PATH: &str = "EXTENSION_PATH";

/// Project selector deploying to every project in the config file
pub const ALL_PROJECTS: &str = "all";

/// Manifest read when no explicit artifact path is configured
pub const MANIFEST_PATH: &str = "package.json";

/// Everything a run needs before talking to the platform
#[derive(Debug)]
pub struct ResolvedConfig {
    pub targets: Vec<Target>,
    pub artifact: ArtifactSource,
}

/// Environment variable holding the API key of a labelled project
pub fn project_api_key_var(label: &str) -> String {
    format!("{}_API_KEY", label)
}

/// Resolve the deployment targets for this run
pub async fn resolve<E>(cli: &CliArgs, env: E) -> Result<ResolvedConfig, DeployError>
where
    E: Fn(&str) -> Option<String>,
{
    match &cli.config_path {
        None => resolve_from_env(&env),
        Some(path) => resolve_from_file(path, cli.project.as_deref(), &env).await,
    }
}

fn resolve_from_env<E>(env: &E) -> Result<ResolvedConfig, DeployError>
where
    E: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let missing: Vec<&str> = [ENV_API_KEY, ENV_PROJECT_ID, ENV_EXTENSION_PATH]
        .into_iter()
        .filter(|key| lookup(*key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(DeployError::ConfigError(format!(
            "Missing environment variables: {}\n\n{}",
            missing.join(", "),
            USAGE
        )));
    }

    let project_id = lookup(ENV_PROJECT_ID).unwrap_or_default();
    let api_key = lookup(ENV_API_KEY).unwrap_or_default();
    let extension_path = lookup(ENV_EXTENSION_PATH).unwrap_or_default();

    debug!(project_id = %project_id, "Using single target from environment");
    Ok(ResolvedConfig {
        targets: vec![Target::new(project_id.clone(), project_id, api_key)?],
        artifact: ArtifactSource::Explicit(PathBuf::from(extension_path)),
    })
}

async fn resolve_from_file<E>(
    path: &Path,
    project: Option<&str>,
    env: &E,
) -> Result<ResolvedConfig, DeployError>
where
    E: Fn(&str) -> Option<String>,
{
    let file = File::new(path);
    if !file.exists().await {
        return Err(DeployError::ConfigError(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let value: serde_json::Value = file.read_json().await.map_err(|e| {
        DeployError::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let config_dir = file.parent_dir();

    match ConfigFile::from_value(value)? {
        ConfigFile::Single(entry) => resolve_single(entry, project, &config_dir, env),
        ConfigFile::Projects(projects) => resolve_projects(projects, project, &config_dir, env),
    }
}

fn resolve_single<E>(
    entry: ProjectEntry,
    project: Option<&str>,
    config_dir: &Path,
    env: &E,
) -> Result<ResolvedConfig, DeployError>
where
    E: Fn(&str) -> Option<String>,
{
    let project_id = entry.project_id.unwrap_or_default();
    let name = match project {
        Some(name) if name != ALL_PROJECTS => name.to_string(),
        _ => project_id.clone(),
    };
    let api_key = entry
        .api_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| env(ENV_API_KEY))
        .unwrap_or_default();

    let artifact = match entry.extension_path {
        Some(extension_path) => ArtifactSource::Explicit(config_dir.join(extension_path)),
        None => artifact_from_env_or_convention(config_dir, env),
    };

    Ok(ResolvedConfig {
        targets: vec![Target::new(name, project_id, api_key)?],
        artifact,
    })
}

fn resolve_projects<E>(
    projects: Vec<(String, ProjectEntry)>,
    project: Option<&str>,
    config_dir: &Path,
    env: &E,
) -> Result<ResolvedConfig, DeployError>
where
    E: Fn(&str) -> Option<String>,
{
    let Some(selector) = project else {
        return Err(DeployError::ConfigError(format!(
            "You should provide 2 arguments: a config file, and the project name from the config file (or '{}')\n\n{}",
            ALL_PROJECTS, USAGE
        )));
    };

    let selected: Vec<(String, ProjectEntry)> = projects
        .into_iter()
        .filter(|(label, _)| selector == ALL_PROJECTS || label == selector)
        .collect();
    if selected.is_empty() {
        return Err(DeployError::ConfigError(format!(
            "Project not found: {}",
            selector
        )));
    }

    let mut targets = Vec::with_capacity(selected.len());
    for (label, entry) in selected {
        let api_key = match entry.api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => key,
            None => {
                let var = project_api_key_var(&label);
                let key = env(&var).filter(|key| !key.trim().is_empty()).ok_or_else(|| {
                    DeployError::ConfigError(format!(
                        "There is no api key for project {}. Environment variable {} is expected.",
                        label, var
                    ))
                })?;
                info!(project = %label, "Api key retrieved from {}", var);
                key
            }
        };
        let project_id = entry.project_id.unwrap_or_default();
        targets.push(Target::new(label, project_id, api_key)?);
    }

    Ok(ResolvedConfig {
        targets,
        artifact: artifact_from_env_or_convention(config_dir, env),
    })
}

fn artifact_from_env_or_convention<E>(config_dir: &Path, env: &E) -> ArtifactSource
where
    E: Fn(&str) -> Option<String>,
{
    match env(ENV_EXTENSION_PATH).filter(|path| !path.trim().is_empty()) {
        Some(path) => ArtifactSource::Explicit(PathBuf::from(path)),
        None => ArtifactSource::Conventional {
            dir: config_dir.to_path_buf(),
            manifest: PathBuf::from(MANIFEST_PATH),
        },
    }
}
