pub mod commands;
pub mod orchestrator;
pub mod runtime;
mod types;

pub use orchestrator::{container_exists, plan, redeploy};
pub use runtime::ContainerRuntime;
pub use types::{PlannedStep, RedeployReport, Step, StepRecord};
