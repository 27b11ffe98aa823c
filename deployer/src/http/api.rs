//! Platform API seam used by the deploy pipeline

use std::sync::Arc;

use async_trait::async_trait;
use openapi_client::models::{ExtensionMetadata, TaskHandle};

use crate::artifact::Artifact;
use crate::errors::DeployError;
use crate::http::client::HttpClient;
use crate::models::target::{SubmitMode, Target};

/// Multipart submission of the artifact to one project
#[derive(Debug, Clone)]
pub struct Submission {
    pub mode: SubmitMode,
    pub project_id: String,
    pub file_name: String,
    pub bytes: Arc<Vec<u8>>,
}

impl Submission {
    pub fn new(artifact: &Artifact, target: &Target, mode: SubmitMode) -> Self {
        Self {
            mode,
            project_id: target.project_id.clone(),
            file_name: artifact.upload_file_name(),
            bytes: artifact.bytes.clone(),
        }
    }
}

/// Platform operations, as a trait for testability
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Extensions in the target project whose name matches `name`
    async fn find_extensions(
        &self,
        target: &Target,
        name: &str,
    ) -> Result<Vec<ExtensionMetadata>, DeployError>;

    /// Create or update the extension; returns the processing task
    async fn submit_extension(
        &self,
        target: &Target,
        submission: Submission,
    ) -> Result<TaskHandle, DeployError>;

    /// Current snapshot of a task
    async fn get_task(&self, target: &Target, task_id: &str) -> Result<TaskHandle, DeployError>;

    /// Mark an extension trusted
    async fn trust_extension(&self, target: &Target, extension_id: &str)
        -> Result<(), DeployError>;
}

#[async_trait]
impl PlatformApi for HttpClient {
    async fn find_extensions(
        &self,
        target: &Target,
        name: &str,
    ) -> Result<Vec<ExtensionMetadata>, DeployError> {
        self.list_extensions(target.api_key(), &target.project_id, name)
            .await
    }

    async fn submit_extension(
        &self,
        target: &Target,
        submission: Submission,
    ) -> Result<TaskHandle, DeployError> {
        HttpClient::submit_extension(self, target.api_key(), submission).await
    }

    async fn get_task(&self, target: &Target, task_id: &str) -> Result<TaskHandle, DeployError> {
        HttpClient::get_task(self, target.api_key(), task_id).await
    }

    async fn trust_extension(
        &self,
        target: &Target,
        extension_id: &str,
    ) -> Result<(), DeployError> {
        HttpClient::trust_extension(self, target.api_key(), extension_id).await
    }
}
