//! Tasks API client

use openapi_client::models::TaskHandle;
use reqwest::Method;

use crate::errors::DeployError;
use crate::http::client::{failure_parts, HttpClient};

impl HttpClient {
    /// Fetch the current snapshot of a task
    pub async fn get_task(&self, api_key: &str, task_id: &str) -> Result<TaskHandle, DeployError> {
        let url = self.url(&format!("/tasks/{}", task_id), &[])?;
        let response = self.request(Method::GET, url, api_key, true).send().await?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(DeployError::RemoteQueryFailed { status, body });
        }

        let task = response.json().await?;
        Ok(task)
    }
}
