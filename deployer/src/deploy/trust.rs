//! Trust setter

use tracing::{error, info};

use crate::errors::DeployError;
use crate::http::api::PlatformApi;
use crate::models::target::Target;

/// Mark `extension_id` trusted in the target project
pub async fn set_trusted<A>(api: &A, target: &Target, extension_id: &str) -> Result<(), DeployError>
where
    A: PlatformApi + ?Sized,
{
    info!(project = %target.name, "Trusting extension {} for {}", extension_id, target.name);

    match api.trust_extension(target, extension_id).await {
        Ok(()) => {
            info!(project = %target.name, "Extension trusted for project {}", target.name);
            Ok(())
        }
        Err(e) => {
            error!(project = %target.name, "Failed to trust the extension: {}", e);
            Err(e)
        }
    }
}
