//! Task completion poller
//!
//! Waits for an asynchronous platform task to reach `done` or `error`. The
//! decision is always taken on a snapshot fetched from the task endpoint;
//! failed status requests are logged and retried on the next tick.

use std::future::Future;
use std::time::Duration;

use openapi_client::models::{TaskHandle, TaskStatus};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::errors::DeployError;
use crate::http::api::PlatformApi;
use crate::models::target::Target;

/// Poller options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay between status requests
    pub interval: Duration,

    /// Give up after this long; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: None,
        }
    }
}

/// Poll `task_id` until it is done or failed
pub async fn wait_for_task<A, S, F>(
    api: &A,
    target: &Target,
    task_id: &str,
    options: &Options,
    sleep_fn: S,
) -> Result<TaskHandle, DeployError>
where
    A: PlatformApi + ?Sized,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let started = Instant::now();
    let mut polls: u32 = 0;

    loop {
        polls += 1;
        match api.get_task(target, task_id).await {
            Ok(mut task) => {
                if task.id.is_empty() {
                    task.id = task_id.to_string();
                }
                match task.status {
                    TaskStatus::Done => {
                        info!(
                            project = %target.name,
                            task = %task.id,
                            elapsed_secs = started.elapsed().as_secs(),
                            polls,
                            "Task completed"
                        );
                        return Ok(task);
                    }
                    TaskStatus::Error => {
                        let metadata = serde_json::to_string(&task)?;
                        error!(
                            project = %target.name,
                            task = %task.id,
                            reason = task.fail_reason.as_deref().unwrap_or("unknown"),
                            "Task failed"
                        );
                        return Err(DeployError::TaskFailed {
                            task_id: task.id,
                            metadata,
                        });
                    }
                    _ => report_progress(target, &task, started),
                }
            }
            Err(e) => {
                warn!(
                    project = %target.name,
                    task = %task_id,
                    "Failed to check task progress, retrying: {}", e
                );
            }
        }

        if let Some(timeout) = options.timeout {
            let waited = started.elapsed();
            if waited >= timeout {
                error!(
                    project = %target.name,
                    task = %task_id,
                    "Gave up waiting for task after {}s", waited.as_secs()
                );
                return Err(DeployError::PollTimedOut {
                    task_id: task_id.to_string(),
                    waited_secs: waited.as_secs(),
                });
            }
        }

        sleep_fn(options.interval).await;
    }
}

fn report_progress(target: &Target, task: &TaskHandle, started: Instant) {
    let elapsed_secs = started.elapsed().as_secs_f64().round() as u64;
    match task.progress_percent() {
        Some(percent) => info!(
            project = %target.name,
            task = %task.id,
            status = ?task.status,
            "Elapsed time {}s ({:.0}%)", elapsed_secs, percent
        ),
        None => info!(
            project = %target.name,
            task = %task.id,
            status = ?task.status,
            "Elapsed time {}s", elapsed_secs
        ),
    }
    debug!(project = %target.name, ?task, "Task snapshot");
}
