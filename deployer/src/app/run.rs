//! Main application run

use std::path::Path;

use tracing::{debug, info};

use crate::app::options::CliArgs;
use crate::app::state::RunContext;
use crate::artifact;
use crate::config::resolver;
use crate::deploy::orchestrator::deploy_all;
use crate::deploy::summary::RunSummary;
use crate::errors::DeployError;
use crate::http::client::HttpClient;

/// `.env` files loaded before resolving, in order; set variables win
const ENV_FILES: [&str; 2] = [".env", "../.env"];

/// Run one deployment
///
/// Configuration problems are returned as errors; per-target failures are
/// part of the returned summary.
pub async fn run(cli: &CliArgs) -> Result<RunSummary, DeployError> {
    info!("Initializing extension deployer...");

    load_env_files();

    let resolved = resolver::resolve(cli, |key| std::env::var(key).ok()).await?;
    let artifact = artifact::locate(&resolved.artifact).await?;

    let options = cli.run_options();
    let api = HttpClient::new(&options.base_url, options.accept_invalid_certs)?;
    debug!(base_url = %api.base_url(), "Platform client ready");

    let ctx = RunContext::new(api, artifact, options);
    let summary = deploy_all(&ctx, resolved.targets, tokio::time::sleep).await;

    Ok(summary)
}

fn load_env_files() {
    for env_file in ENV_FILES {
        let path = Path::new(env_file);
        if !path.is_file() {
            continue;
        }
        match dotenvy::from_path(path) {
            Ok(()) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("Ignoring {}: {}", path.display(), e),
        }
    }
}
