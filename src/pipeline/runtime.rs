use crate::docker::{Captured, ContainerCommand, ContainerResult, DockerCli};
use crate::error::{RedeployError, Result};

use super::types::Step;

/// The seam between the redeploy sequence and the container runtime.
///
/// Implementations only report what the runtime did; deciding whether a
/// non-zero exit is fatal is left to the caller.
pub trait ContainerRuntime {
    /// Run to completion and hand back stdout.
    fn capture(&self, step: Step, cmd: &ContainerCommand) -> Result<Captured>;

    /// Run with output relayed to the terminal as it arrives.
    fn execute(&self, step: Step, cmd: &ContainerCommand) -> Result<ContainerResult>;
}

impl ContainerRuntime for DockerCli {
    fn capture(&self, step: Step, cmd: &ContainerCommand) -> Result<Captured> {
        tracing::debug!(%step, command = %cmd.display_with(self.program()), "capturing");
        DockerCli::capture(self, cmd).map_err(|source| self.spawn_error(step, source))
    }

    fn execute(&self, step: Step, cmd: &ContainerCommand) -> Result<ContainerResult> {
        tracing::debug!(%step, command = %cmd.display_with(self.program()), "executing");
        self.stream(cmd)
            .map_err(|source| self.spawn_error(step, source))
    }
}

impl DockerCli {
    fn spawn_error(&self, step: Step, source: std::io::Error) -> RedeployError {
        RedeployError::Spawn {
            program: self.program().to_string(),
            step,
            source,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_maps_to_spawn_error() {
        let cli = DockerCli::new("redeploy-no-such-runtime");
        let err = ContainerRuntime::execute(&cli, Step::Build, &ContainerCommand::new(["build"]))
            .unwrap_err();
        match err {
            RedeployError::Spawn { program, step, .. } => {
                assert_eq!(program, "redeploy-no-such-runtime");
                assert_eq!(step, Step::Build);
            }
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[test]
    fn capture_goes_through_the_binary() {
        let cli = DockerCli::new("sh");
        let out = ContainerRuntime::capture(
            &cli,
            Step::Inspect,
            &ContainerCommand::new(["-c", "echo bot1"]),
        )
        .unwrap();
        assert_eq!(out.stdout.trim(), "bot1");
    }
}
