//! Shared fixtures for the integration tests

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::{ready, Ready};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use extdeploy::app::options::RunOptions;
use extdeploy::app::state::RunContext;
use extdeploy::artifact::Artifact;
use extdeploy::errors::DeployError;
use extdeploy::filesys::file::File;
use extdeploy::http::api::{PlatformApi, Submission};
use extdeploy::models::target::{SubmitMode, Target};
use flate2::write::GzEncoder;
use flate2::Compression;
use http::StatusCode;
use openapi_client::models::{ExtensionMetadata, TaskHandle, TaskStatus};

/// Scripted platform reply
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, &'static str),
    Network,
}

impl<T> Reply<T> {
    fn into_result(
        self,
        on_status: impl FnOnce(StatusCode, String) -> DeployError,
    ) -> Result<T, DeployError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Status(code, body) => {
                let status = StatusCode::from_u16(code).expect("valid status code");
                Err(on_status(status, body.to_string()))
            }
            Reply::Network => Err(DeployError::Internal("connection reset by peer".to_string())),
        }
    }
}

/// A recorded platform call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Find { project: String, name: String },
    Submit { project: String, mode: SubmitMode, file_name: String },
    GetTask { project: String, task_id: String },
    Trust { project: String, extension_id: String },
}

impl Call {
    pub fn project(&self) -> &str {
        match self {
            Call::Find { project, .. }
            | Call::Submit { project, .. }
            | Call::GetTask { project, .. }
            | Call::Trust { project, .. } => project,
        }
    }
}

/// Replies for one project; the last task reply repeats once exhausted
#[derive(Debug, Default)]
pub struct ProjectScript {
    lookups: VecDeque<Reply<Vec<ExtensionMetadata>>>,
    submit: Option<Reply<TaskHandle>>,
    tasks: VecDeque<Reply<TaskHandle>>,
    last_task: Option<Reply<TaskHandle>>,
    trust: Option<Reply<()>>,
}

impl ProjectScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(mut self, reply: Reply<Vec<ExtensionMetadata>>) -> Self {
        self.lookups.push_back(reply);
        self
    }

    pub fn submit(mut self, reply: Reply<TaskHandle>) -> Self {
        self.submit = Some(reply);
        self
    }

    pub fn task(mut self, reply: Reply<TaskHandle>) -> Self {
        self.tasks.push_back(reply);
        self
    }

    pub fn trust(mut self, reply: Reply<()>) -> Self {
        self.trust = Some(reply);
        self
    }
}

/// In-memory platform keyed by project id
#[derive(Default)]
pub struct FakeApi {
    scripts: Mutex<HashMap<String, ProjectScript>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project_id: &str, script: ProjectScript) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(project_id.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, project_id: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.project() == project_id)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlatformApi for FakeApi {
    async fn find_extensions(
        &self,
        target: &Target,
        name: &str,
    ) -> Result<Vec<ExtensionMetadata>, DeployError> {
        self.record(Call::Find {
            project: target.project_id.clone(),
            name: name.to_string(),
        });
        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&target.project_id)
            .and_then(|script| script.lookups.pop_front())
            .unwrap_or(Reply::Ok(Vec::new()));
        reply.into_result(|status, body| DeployError::RemoteQueryFailed { status, body })
    }

    async fn submit_extension(
        &self,
        target: &Target,
        submission: Submission,
    ) -> Result<TaskHandle, DeployError> {
        self.record(Call::Submit {
            project: submission.project_id.clone(),
            mode: submission.mode.clone(),
            file_name: submission.file_name.clone(),
        });
        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get(&target.project_id)
            .and_then(|script| script.submit.clone())
            .expect("submit reply scripted");
        reply.into_result(|status, body| DeployError::SubmissionFailed { status, body })
    }

    async fn get_task(&self, target: &Target, task_id: &str) -> Result<TaskHandle, DeployError> {
        self.record(Call::GetTask {
            project: target.project_id.clone(),
            task_id: task_id.to_string(),
        });
        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts
                .get_mut(&target.project_id)
                .expect("project scripted");
            match script.tasks.pop_front() {
                Some(reply) => {
                    script.last_task = Some(reply.clone());
                    reply
                }
                None => script.last_task.clone().expect("task reply scripted"),
            }
        };
        reply.into_result(|status, body| DeployError::RemoteQueryFailed { status, body })
    }

    async fn trust_extension(
        &self,
        target: &Target,
        extension_id: &str,
    ) -> Result<(), DeployError> {
        self.record(Call::Trust {
            project: target.project_id.clone(),
            extension_id: extension_id.to_string(),
        });
        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get(&target.project_id)
            .and_then(|script| script.trust.clone())
            .unwrap_or(Reply::Ok(()));
        reply.into_result(|status, body| DeployError::TrustFailed { status, body })
    }
}

pub fn extension(id: &str) -> ExtensionMetadata {
    ExtensionMetadata {
        id: id.to_string(),
        name: "my-ext".to_string(),
        version: "1.0.0".to_string(),
        trusted: false,
    }
}

pub fn task(id: &str, status: TaskStatus) -> TaskHandle {
    TaskHandle {
        id: id.to_string(),
        status,
        progress: None,
        current_step: None,
        total_step: None,
        fail_reason: None,
        name: None,
    }
}

pub fn target(name: &str, project_id: &str) -> Target {
    Target::new(name, project_id, format!("key-{}", project_id)).unwrap()
}

pub fn artifact() -> Artifact {
    Artifact {
        file: File::new("/deploy/my-ext-extension.tar.gz"),
        name: "my-ext".to_string(),
        bytes: Arc::new(b"not really a tarball".to_vec()),
    }
}

pub fn context(api: FakeApi) -> RunContext<FakeApi> {
    RunContext::new(api, artifact(), RunOptions::default())
}

/// Sleep function that records requested delays and returns immediately
#[derive(Default)]
pub struct SleepRecorder {
    delays: RefCell<Vec<Duration>>,
}

impl SleepRecorder {
    pub fn sleep_fn(&self) -> impl Fn(Duration) -> Ready<()> + '_ {
        move |delay| {
            self.delays.borrow_mut().push(delay);
            ready(())
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

/// Write a gzip tarball containing the given `(path, contents)` entries
pub fn write_tarball(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, contents.as_bytes())
            .unwrap();
    }
    let mut encoder = builder.into_inner().unwrap();
    encoder.flush().unwrap();
    encoder.finish().unwrap();
}
