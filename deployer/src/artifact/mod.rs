//! Packaged extension artifact location

pub mod manifest;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::utils::sha256_hash;

/// Suffix appended to the uploaded file name so the platform can tell
/// submissions made by this tool apart
pub const UPLOAD_NAME_SUFFIX: &str = "_CU";

/// The packaged extension, read once and shared by every target
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Location on disk
    pub file: File,

    /// Declared extension name, used as the lookup filter
    pub name: String,

    /// Raw `.tar.gz` bytes
    pub bytes: Arc<Vec<u8>>,
}

impl Artifact {
    /// File name sent in the multipart `file` part
    pub fn upload_file_name(&self) -> String {
        format!("{}{}", self.file.file_name(), UPLOAD_NAME_SUFFIX)
    }
}

/// Where to find the artifact
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// An explicit `EXTENSION_PATH`; the name comes from the archive
    Explicit(PathBuf),

    /// `<dir>/<name>-extension.tar.gz`, with the name read from `manifest`
    Conventional { dir: PathBuf, manifest: PathBuf },
}

/// Path of the conventionally named artifact for an extension
pub fn conventional_path(dir: &Path, extension_name: &str) -> PathBuf {
    dir.join(format!("{}-extension.tar.gz", extension_name))
}

/// Resolve, read and name the artifact
pub async fn locate(source: &ArtifactSource) -> Result<Artifact, DeployError> {
    let (file, known_name) = match source {
        ArtifactSource::Explicit(path) => (File::new(path), None),
        ArtifactSource::Conventional { dir, manifest } => {
            let name = manifest::read_name_from_manifest(&File::new(manifest)).await?;
            (File::new(conventional_path(dir, &name)), Some(name))
        }
    };

    if !file.exists().await {
        return Err(DeployError::ConfigError(format!(
            "Extension not found at {}. Did you enter the correct name?",
            file.path().display()
        )));
    }

    let bytes = file.read_bytes().await?;
    let name = match known_name {
        Some(name) => name,
        None => manifest::read_name_from_archive(bytes.clone()).await?,
    };

    info!(
        extension = %name,
        path = %file.path().display(),
        size = bytes.len(),
        sha256 = %sha256_hash(&bytes),
        "Located extension artifact"
    );

    Ok(Artifact {
        file,
        name,
        bytes: Arc::new(bytes),
    })
}
