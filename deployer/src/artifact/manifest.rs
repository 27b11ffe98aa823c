//! Extension manifest (`package.json`) reading
//!
//! The declared extension name lives in `package.json`, either next to the
//! config file or inside the gzip tarball produced by the extension build.

use std::io::{Cursor, Read};
use std::path::{Component, Path};

use anyhow::{bail, Context};
use flate2::read::GzDecoder;
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::errors::DeployError;
use crate::filesys::file::File;

const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    name: String,
}

fn manifest_name(raw: &str) -> anyhow::Result<String> {
    let manifest: PackageManifest =
        serde_json::from_str(raw).context("package.json is not valid JSON")?;
    if manifest.name.trim().is_empty() {
        bail!("package.json has no name");
    }
    Ok(manifest.name)
}

/// Read the extension name from a `package.json` on disk
pub async fn read_name_from_manifest(manifest: &File) -> Result<String, DeployError> {
    if !manifest.exists().await {
        return Err(DeployError::ConfigError(
            "package.json file not found".to_string(),
        ));
    }
    let raw = manifest.read_string().await?;
    manifest_name(&raw).map_err(|e| DeployError::ConfigError(format!("{:#}", e)))
}

/// Read the extension name from the `package.json` packed inside a `.tar.gz`
pub async fn read_name_from_archive(data: Vec<u8>) -> Result<String, DeployError> {
    spawn_blocking(move || read_name_from_archive_sync(&data))
        .await
        .map_err(|e| DeployError::Internal(e.to_string()))?
        .map_err(|e| DeployError::ArchiveError(format!("{:#}", e)))
}

fn read_name_from_archive_sync(data: &[u8]) -> anyhow::Result<String> {
    let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(data)));

    for entry in archive.entries().context("failed to read archive")? {
        let mut entry = entry.context("failed to read archive entry")?;
        let path = entry.path().context("invalid entry path")?.into_owned();
        if !is_manifest_path(&path) {
            continue;
        }

        debug!(entry = %path.display(), "found extension manifest");
        let mut raw = String::new();
        entry
            .read_to_string(&mut raw)
            .context("failed to read package.json from archive")?;
        return manifest_name(&raw);
    }

    bail!("package.json not found in archive")
}

/// `package.json` at the archive root or one directory deep
fn is_manifest_path(path: &Path) -> bool {
    let parts: Vec<_> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    match parts.as_slice() {
        [Component::Normal(name)] => *name == MANIFEST_FILE,
        [Component::Normal(_), Component::Normal(name)] => *name == MANIFEST_FILE,
        _ => false,
    }
}
