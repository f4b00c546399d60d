use std::io::{self, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use super::run;
use super::types::{Captured, ContainerCommand, ContainerResult, OutputLine};

/// Verify that the runtime daemon is reachable.
pub fn ensure_available(program: &str) -> Result<()> {
    let status = Command::new(program)
        .args(["version", "--format", "{{.Server.Version}}"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to invoke `{program}`, is it installed and on PATH?"))?;

    if !status.success() {
        bail!("{program} daemon is not running ({status})");
    }
    Ok(())
}

/// Invokes a docker-compatible CLI binary.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run to completion and collect stdout. Stderr goes straight to the
    /// terminal so the runtime's own error text stays visible.
    pub fn capture(&self, cmd: &ContainerCommand) -> io::Result<Captured> {
        let output = Command::new(&self.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()?;

        Ok(Captured {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    /// Run with output relayed line by line to this process's stdout/stderr.
    pub fn stream(&self, cmd: &ContainerCommand) -> io::Result<ContainerResult> {
        let rx = run::spawn(&self.program, cmd)?;

        for line in rx {
            match line {
                // A closed terminal pipe must not abort the deploy.
                OutputLine::Stdout(s) => {
                    let _ = writeln!(io::stdout().lock(), "{s}");
                }
                OutputLine::Stderr(s) => {
                    let _ = writeln!(io::stderr().lock(), "{s}");
                }
                OutputLine::Done(result) => return Ok(result),
            }
        }

        Err(io::Error::other(format!(
            "`{}` output stream ended without an exit status",
            self.program
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_available_reports_missing_binary() {
        let err = ensure_available("redeploy-no-such-runtime").unwrap_err();
        assert!(err.to_string().contains("redeploy-no-such-runtime"));
    }

    #[cfg(unix)]
    #[test]
    fn capture_collects_stdout_and_exit_code() {
        let cli = DockerCli::new("sh");
        let out = cli
            .capture(&ContainerCommand::new(["-c", "echo bot1; echo bot10; exit 0"]))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "bot1\nbot10\n");

        let out = cli.capture(&ContainerCommand::new(["-c", "exit 4"])).unwrap();
        assert_eq!(out.exit_code, Some(4));
        assert!(!out.success());
    }

    #[cfg(unix)]
    #[test]
    fn stream_returns_final_status() {
        let cli = DockerCli::new("sh");
        let result = cli
            .stream(&ContainerCommand::new(["-c", "echo building; exit 2"]))
            .unwrap();
        assert_eq!(result.exit_code, Some(2));
        assert!(!result.success);
    }

    #[test]
    fn program_is_exposed() {
        assert_eq!(DockerCli::new("podman").program(), "podman");
    }
}
