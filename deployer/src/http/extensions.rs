//! Extensions API client

use openapi_client::models::{ExtensionList, ExtensionMetadata, TaskHandle, TrustRequest};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use tracing::error;

use crate::errors::DeployError;
use crate::http::api::Submission;
use crate::http::client::{failure_parts, HttpClient};
use crate::models::target::SubmitMode;

impl HttpClient {
    /// List extensions in a project whose name matches `filter`
    pub async fn list_extensions(
        &self,
        api_key: &str,
        project_id: &str,
        filter: &str,
    ) -> Result<Vec<ExtensionMetadata>, DeployError> {
        let url = self.url(
            "/extensions",
            &[("projectId", project_id), ("filter", filter)],
        )?;
        let response = self.request(Method::GET, url, api_key, true).send().await?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            error!("Extension query failed: {} - {}", status, body);
            return Err(DeployError::RemoteQueryFailed { status, body });
        }

        let list: ExtensionList = response.json().await?;
        Ok(list.into_matches())
    }

    /// Upload a new extension or a new version of an existing one
    pub async fn submit_extension(
        &self,
        api_key: &str,
        submission: Submission,
    ) -> Result<TaskHandle, DeployError> {
        let path = match submission.mode {
            SubmitMode::Create => "/extensions/upload",
            SubmitMode::Update { .. } => "/extensions/update",
        };
        let url = self.url(path, &[])?;

        let mut form = Form::new().text("projectId", submission.project_id);
        if let SubmitMode::Update { extension_id } = submission.mode {
            form = form.text("extension", extension_id);
        }
        let file = Part::bytes(submission.bytes.to_vec())
            .file_name(submission.file_name)
            .mime_str("application/octet-stream")?;
        form = form.part("file", file);

        let response = self
            .request(Method::POST, url, api_key, false)
            .multipart(form)
            .send()
            .await?;

        if response.status() != StatusCode::ACCEPTED {
            let (status, body) = failure_parts(response).await;
            error!("Task has not been created: {} - {}", status, body);
            return Err(DeployError::SubmissionFailed { status, body });
        }

        let task: TaskHandle = response.json().await?;
        Ok(task)
    }

    /// Mark an extension as trusted
    pub async fn trust_extension(
        &self,
        api_key: &str,
        extension_id: &str,
    ) -> Result<(), DeployError> {
        let url = self.url(&format!("/extensions/{}", extension_id), &[])?;
        let response = self
            .request(Method::PATCH, url, api_key, true)
            .json(&TrustRequest { trusted_code: true })
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            let (status, body) = failure_parts(response).await;
            return Err(DeployError::TrustFailed { status, body });
        }
        Ok(())
    }
}
