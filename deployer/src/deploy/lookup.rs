//! Existing extension lookup

use openapi_client::models::ExtensionMetadata;
use tracing::info;

use crate::errors::DeployError;
use crate::http::api::PlatformApi;
use crate::models::target::{SubmitMode, Target};

/// Extensions named `extension_name` in the target project, possibly none
pub async fn lookup_extension<A>(
    api: &A,
    target: &Target,
    extension_name: &str,
) -> Result<Vec<ExtensionMetadata>, DeployError>
where
    A: PlatformApi + ?Sized,
{
    info!(project = %target.name, "Check if {} exists in {}", extension_name, target.name);
    api.find_extensions(target, extension_name).await
}

/// Update the first match if there is one, otherwise create
pub fn decide_mode(matches: &[ExtensionMetadata]) -> SubmitMode {
    match matches.first() {
        Some(existing) => SubmitMode::Update {
            extension_id: existing.id.clone(),
        },
        None => SubmitMode::Create,
    }
}

/// Id of the extension as it exists after processing
pub async fn resolve_extension_id<A>(
    api: &A,
    target: &Target,
    extension_name: &str,
) -> Result<String, DeployError>
where
    A: PlatformApi + ?Sized,
{
    let matches = api.find_extensions(target, extension_name).await?;
    matches
        .into_iter()
        .next()
        .map(|extension| extension.id)
        .ok_or_else(|| DeployError::ExtensionNotFound(extension_name.to_string()))
}
