//! Per-target deploy pipeline and the run-wide join
//!
//! Each target walks lookup → submit → poll → trust, awaiting every stage
//! before starting the next. Targets run concurrently as futures of one
//! structured join, and a failing target never stops its siblings.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use openapi_client::models::{ExtensionMetadata, TaskHandle};
use tracing::{debug, error, info};

use crate::app::state::RunContext;
use crate::deploy::fsm::{DeploymentFsm, TargetEvent, TargetState};
use crate::deploy::summary::{RunSummary, TargetOutcome};
use crate::deploy::{lookup, poller, trust};
use crate::errors::DeployError;
use crate::http::api::{PlatformApi, Submission};
use crate::models::target::{SubmitMode, Target};

/// Pipeline state of one target
pub struct TargetRun {
    target: Target,
    fsm: DeploymentFsm,
    mode: Option<SubmitMode>,
    existing_match: Option<ExtensionMetadata>,
    task: Option<TaskHandle>,
    extension_id: Option<String>,
}

impl TargetRun {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            fsm: DeploymentFsm::new(),
            mode: None,
            existing_match: None,
            task: None,
            extension_id: None,
        }
    }

    async fn execute<A, S, F>(&mut self, ctx: &RunContext<A>, sleep_fn: S) -> Result<(), DeployError>
    where
        A: PlatformApi,
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        let extension_name = ctx.artifact.name.as_str();

        // Pending -> Checked
        let matches = lookup::lookup_extension(&ctx.api, &self.target, extension_name).await?;
        let mode = lookup::decide_mode(&matches);
        self.existing_match = matches.into_iter().next();
        if let Some(existing) = &self.existing_match {
            debug!(
                project = %self.target.name,
                extension = %existing.id,
                version = %existing.version,
                trusted = existing.trusted,
                "Found existing extension"
            );
        }
        self.mode = Some(mode.clone());
        self.fsm.process(TargetEvent::Checked)?;

        // Checked -> Submitted
        match &mode {
            SubmitMode::Create => {
                info!(project = %self.target.name, "Upload new extension in {}", self.target.name)
            }
            SubmitMode::Update { extension_id } => info!(
                project = %self.target.name,
                extension = %extension_id,
                "Update extension in {}", self.target.name
            ),
        }
        let submission = Submission::new(&ctx.artifact, &self.target, mode);
        let task = ctx.api.submit_extension(&self.target, submission).await?;
        if task.id.is_empty() {
            return Err(DeployError::Internal(
                "Upload accepted but no task id was returned".to_string(),
            ));
        }
        info!(project = %self.target.name, task = %task.id, "Processing task created");
        let task_id = task.id.clone();
        self.task = Some(task);
        self.fsm.process(TargetEvent::Submitted)?;

        // Submitted -> Polling -> Trusting
        self.fsm.process(TargetEvent::PollStarted)?;
        let finished = poller::wait_for_task(
            &ctx.api,
            &self.target,
            &task_id,
            &ctx.options.poller,
            sleep_fn,
        )
        .await?;
        self.task = Some(finished);
        self.fsm.process(TargetEvent::TaskSucceeded)?;

        // Trusting -> Done
        let extension_id =
            lookup::resolve_extension_id(&ctx.api, &self.target, extension_name).await?;
        self.extension_id = Some(extension_id.clone());
        trust::set_trusted(&ctx.api, &self.target, &extension_id).await?;
        self.fsm.process(TargetEvent::Trusted)?;

        Ok(())
    }

    fn fail(&mut self, err: DeployError) {
        error!(
            project = %self.target.name,
            stage = %self.fsm.state(),
            "Deployment failed: {}", err
        );
        if let Err(e) = self.fsm.process(TargetEvent::Fail(err.to_string())) {
            debug!(project = %self.target.name, "Ignoring failure event: {}", e);
        }
    }

    fn into_outcome(self) -> TargetOutcome {
        TargetOutcome {
            project: self.target.name,
            mode: self.mode,
            state: self.fsm.state(),
            failed_at: self.fsm.failed_at(),
            task_id: self.task.map(|task| task.id),
            extension_id: self.extension_id,
            error: self.fsm.error().map(str::to_string),
        }
    }
}

/// Run the whole pipeline for one target
pub async fn deploy_target<A, S, F>(ctx: &RunContext<A>, target: Target, sleep_fn: S) -> TargetOutcome
where
    A: PlatformApi,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let mut run = TargetRun::new(target);
    if let Err(e) = run.execute(ctx, sleep_fn).await {
        run.fail(e);
    }

    let outcome = run.into_outcome();
    if outcome.state == TargetState::Done {
        info!(project = %outcome.project, "Extension uploaded successfully");
    }
    outcome
}

/// Deploy to every target concurrently and collect one outcome per target
pub async fn deploy_all<A, S, F>(
    ctx: &RunContext<A>,
    targets: Vec<Target>,
    sleep_fn: S,
) -> RunSummary
where
    A: PlatformApi,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!(
        targets = targets.len(),
        extension = %ctx.artifact.name,
        "Deploying extension"
    );

    let pipelines = targets
        .into_iter()
        .map(|target| deploy_target(ctx, target, &sleep_fn));
    let outcomes = join_all(pipelines).await;

    RunSummary::new(outcomes)
}
