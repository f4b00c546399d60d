use std::fmt;

use crate::docker::ContainerCommand;

/// Identifies which redeploy step is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Inspect,
    Stop,
    Remove,
    RemoveImage,
    Build,
    Run,
    Logs,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Inspect => "inspect",
            Step::Stop => "stop",
            Step::Remove => "remove",
            Step::RemoveImage => "remove-image",
            Step::Build => "build",
            Step::Run => "run",
            Step::Logs => "logs",
        }
    }

    /// Teardown steps only run when the container already exists.
    pub fn is_teardown(&self) -> bool {
        matches!(self, Step::Stop | Step::Remove | Step::RemoveImage)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed step and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub success: bool,
    pub exit_code: Option<i32>,
}

/// What a completed redeploy did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedeployReport {
    /// An existing container was torn down first.
    pub replaced_existing: bool,
    pub steps: Vec<StepRecord>,
    /// Exit status the process should report: the log-follow command's when
    /// it ran, otherwise zero.
    pub exit_code: i32,
}

impl RedeployReport {
    pub fn executed(&self) -> Vec<Step> {
        self.steps.iter().map(|r| r.step).collect()
    }
}

/// A step as it would run, for `--dry-run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: Step,
    pub command: ContainerCommand,
}
