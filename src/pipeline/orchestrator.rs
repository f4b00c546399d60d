use crate::config::Deployment;
use crate::docker::{Captured, ContainerCommand};
use crate::error::{RedeployError, Result};

use super::commands::{
    build_command, inspect_command, listing_contains, logs_command, remove_command,
    remove_image_command, run_command, stop_command,
};
use super::runtime::ContainerRuntime;
use super::types::{PlannedStep, RedeployReport, Step, StepRecord};

/// Replace the configured container with a freshly built one.
///
/// Steps run strictly in order and the first fatal failure returns
/// immediately, leaving the runtime in whatever state it reached. Only the
/// forced image removal is allowed to fail. When log following is enabled
/// this blocks until the log stream ends.
pub fn redeploy<R>(runtime: &R, d: &Deployment) -> Result<RedeployReport>
where
    R: ContainerRuntime + ?Sized,
{
    let mut report = RedeployReport::default();

    // ── Existence check ──────────────────────────────────────────────
    let listing = inspect(runtime, d)?;
    report.steps.push(StepRecord {
        step: Step::Inspect,
        success: listing.success(),
        exit_code: listing.exit_code,
    });
    let exists = listing_contains(&listing.stdout, &d.container);

    // ── Teardown ─────────────────────────────────────────────────────
    if exists {
        tracing::info!(container = %d.container, "replacing existing container");
        report.replaced_existing = true;

        run_step(runtime, &mut report, Step::Stop, &stop_command(d))?;
        run_step(runtime, &mut report, Step::Remove, &remove_command(d))?;

        let cmd = remove_image_command(d);
        let result = runtime.execute(Step::RemoveImage, &cmd)?;
        if !result.success {
            tracing::warn!(
                image = %d.image,
                exit_code = ?result.exit_code,
                "image removal failed, continuing"
            );
        }
        report.steps.push(StepRecord {
            step: Step::RemoveImage,
            success: result.success,
            exit_code: result.exit_code,
        });
    } else {
        tracing::info!(container = %d.container, "no existing container");
    }

    // ── Build and run ────────────────────────────────────────────────
    run_step(runtime, &mut report, Step::Build, &build_command(d))?;
    run_step(runtime, &mut report, Step::Run, &run_command(d))?;

    // ── Logs ─────────────────────────────────────────────────────────
    if d.follow_logs {
        tracing::info!(container = %d.container, "following logs");
        let result = runtime.execute(Step::Logs, &logs_command(d))?;
        report.steps.push(StepRecord {
            step: Step::Logs,
            success: result.success,
            exit_code: result.exit_code,
        });
        report.exit_code = result.exit_code.unwrap_or(1);
    }

    Ok(report)
}

/// Ask the runtime whether a container with exactly the configured name
/// exists, running or stopped.
pub fn container_exists<R>(runtime: &R, d: &Deployment) -> Result<bool>
where
    R: ContainerRuntime + ?Sized,
{
    let listing = inspect(runtime, d)?;
    Ok(listing_contains(&listing.stdout, &d.container))
}

/// Run the name-filtered listing; a non-zero exit is fatal.
fn inspect<R>(runtime: &R, d: &Deployment) -> Result<Captured>
where
    R: ContainerRuntime + ?Sized,
{
    let out = runtime.capture(Step::Inspect, &inspect_command(d))?;
    if !out.success() {
        return Err(RedeployError::StepFailed {
            step: Step::Inspect,
            exit_code: out.exit_code,
        });
    }
    Ok(out)
}

/// Every command a redeploy may issue, in order. Teardown steps are only
/// issued when the container already exists; see [`Step::is_teardown`].
pub fn plan(d: &Deployment) -> Vec<PlannedStep> {
    let mut steps = vec![
        planned(Step::Inspect, inspect_command(d)),
        planned(Step::Stop, stop_command(d)),
        planned(Step::Remove, remove_command(d)),
        planned(Step::RemoveImage, remove_image_command(d)),
        planned(Step::Build, build_command(d)),
        planned(Step::Run, run_command(d)),
    ];
    if d.follow_logs {
        steps.push(planned(Step::Logs, logs_command(d)));
    }
    steps
}

fn planned(step: Step, command: ContainerCommand) -> PlannedStep {
    PlannedStep { step, command }
}

/// Execute a step whose failure ends the redeploy.
fn run_step<R>(
    runtime: &R,
    report: &mut RedeployReport,
    step: Step,
    cmd: &ContainerCommand,
) -> Result<()>
where
    R: ContainerRuntime + ?Sized,
{
    tracing::info!(%step, "starting");
    let result = runtime.execute(step, cmd)?;
    report.steps.push(StepRecord {
        step,
        success: result.success,
        exit_code: result.exit_code,
    });

    if !result.success {
        tracing::error!(%step, exit_code = ?result.exit_code, "step failed");
        return Err(RedeployError::StepFailed {
            step,
            exit_code: result.exit_code,
        });
    }
    tracing::info!(%step, "done");
    Ok(())
}
