//! Run outcome reporting

use colored::Colorize;

use crate::deploy::fsm::TargetState;
use crate::models::target::SubmitMode;

/// Final result of one target's pipeline
#[derive(Debug, Clone)]
pub struct TargetOutcome {
    /// Target label
    pub project: String,

    /// Create or update, once decided
    pub mode: Option<SubmitMode>,

    /// Terminal state (`Done` or `Failed`)
    pub state: TargetState,

    /// Stage that failed, if any
    pub failed_at: Option<TargetState>,

    /// Processing task id, once submitted
    pub task_id: Option<String>,

    /// Extension id resolved for trusting
    pub extension_id: Option<String>,

    /// Failure reason
    pub error: Option<String>,
}

impl TargetOutcome {
    pub fn is_success(&self) -> bool {
        self.state == TargetState::Done
    }

    /// Processing finished but the extension could not be trusted
    pub fn processed_but_untrusted(&self) -> bool {
        self.failed_at == Some(TargetState::Trusting)
    }

    fn describe(&self) -> String {
        let mode = self.mode.as_ref().map(SubmitMode::as_str).unwrap_or("-");
        if self.is_success() {
            return format!(
                "{} ({}, extension {})",
                self.project,
                mode,
                self.extension_id.as_deref().unwrap_or("?")
            );
        }

        let stage = self.failed_at.map(stage_name).unwrap_or("unknown");
        let mut line = format!(
            "{} ({}, failed while {}): {}",
            self.project,
            mode,
            stage,
            self.error.as_deref().unwrap_or("unknown error")
        );
        if let Some(task_id) = &self.task_id {
            line.push_str(&format!(" [task {}]", task_id));
        }
        if self.processed_but_untrusted() {
            line.push_str(" (extension was processed but is not trusted)");
        }
        line
    }
}

/// Stage that was running when a target failed in `state`
fn stage_name(state: TargetState) -> &'static str {
    match state {
        TargetState::Pending => "looking up",
        TargetState::Checked => "submitting",
        TargetState::Submitted | TargetState::Polling => "polling",
        TargetState::Trusting => "trusting",
        TargetState::Done | TargetState::Failed => "finishing",
    }
}

/// Outcomes of every target in a run, in target order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<TargetOutcome>,
}

impl RunSummary {
    pub fn new(outcomes: Vec<TargetOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn failed(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Process exit status; target failures only count when `strict`
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.all_succeeded() {
            1
        } else {
            0
        }
    }

    /// Print the end-of-run report to stdout
    pub fn print(&self) {
        println!();
        for outcome in &self.outcomes {
            if outcome.is_success() {
                println!("{} {}", "[DEPLOYED]".green().bold(), outcome.describe());
            } else {
                println!("{} {}", "[FAILED]".red().bold(), outcome.describe());
            }
        }

        if self.all_succeeded() {
            println!("{}", "All tasks completed successfully.".green());
        } else {
            let failed: Vec<&str> = self.failed().map(|o| o.project.as_str()).collect();
            println!("{} {}", "Failed tasks:".red(), failed.join(", "));
        }
    }
}
