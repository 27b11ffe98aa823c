//! API models

use serde::{Deserialize, Serialize};

/// Extension record as returned by the extensions endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "trustedCode", default)]
    pub trusted: bool,
}

/// Response of `GET /extensions?projectId=&filter=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionList {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub items: Vec<ExtensionMetadata>,
}

impl ExtensionList {
    /// Matching records, empty when the platform reports none.
    ///
    /// A zero `total` wins over a non-empty `items` array.
    pub fn into_matches(self) -> Vec<ExtensionMetadata> {
        if self.total == 0 {
            return Vec::new();
        }
        self.items
    }
}

/// Status of an asynchronous platform task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Active,
    Done,
    Error,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Error)
    }
}

/// Snapshot of an asynchronous task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    /// Empty when the platform omits `_id` from a snapshot
    #[serde(rename = "_id", default)]
    pub id: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_step: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TaskHandle {
    /// Percent complete, if the platform reports it
    pub fn progress_percent(&self) -> Option<f64> {
        if let Some(progress) = self.progress {
            return Some(progress);
        }
        match (self.current_step, self.total_step) {
            (Some(current), Some(total)) if total > 0 => {
                Some(current as f64 / total as f64 * 100.0)
            }
            _ => None,
        }
    }
}

/// Body of `PATCH /extensions/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustRequest {
    pub trusted_code: bool,
}
