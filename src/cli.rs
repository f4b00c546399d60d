//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{Overrides, split_run_args};

#[derive(Debug, Parser)]
#[command(name = "redeploy")]
#[command(
    version,
    about = "Rebuild the bot image, replace its container, and follow the logs",
    long_about = None
)]
pub struct Args {
    /// Image name to build and run
    #[arg(short, long, env = "REDEPLOY_IMAGE")]
    pub image: Option<String>,

    /// Container name to replace
    #[arg(short, long, env = "REDEPLOY_CONTAINER")]
    pub container: Option<String>,

    /// Host project directory bind-mounted into the container
    #[arg(short, long, env = "REDEPLOY_PROJECT_PATH", value_name = "DIR")]
    pub project_path: Option<PathBuf>,

    /// Path the project directory is mounted at inside the container [default: /app]
    #[arg(long, env = "REDEPLOY_MOUNT_TARGET", value_name = "PATH")]
    pub mount_target: Option<String>,

    /// Build context directory [default: .]
    #[arg(long, env = "REDEPLOY_CONTEXT", value_name = "DIR")]
    pub context: Option<PathBuf>,

    /// Dockerfile to build with, relative to the working directory
    #[arg(short = 'f', long, env = "REDEPLOY_DOCKERFILE", value_name = "FILE")]
    pub dockerfile: Option<PathBuf>,

    /// Container runtime binary [default: docker]
    #[arg(long, env = "REDEPLOY_RUNTIME", value_name = "BIN")]
    pub runtime: Option<String>,

    /// Extra `run` arguments as one shell-quoted string
    #[arg(long, env = "REDEPLOY_RUN_ARGS", value_name = "ARGS", allow_hyphen_values = true)]
    pub run_args: Option<String>,

    /// Start the container and exit instead of following its logs
    #[arg(long)]
    pub no_follow: bool,

    /// Also append followed log lines to this file
    #[arg(long, env = "REDEPLOY_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Config file to read instead of ./.redeploy.yml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Collect the settings given on the command line or in the environment.
    pub fn overrides(&self) -> crate::Result<Overrides> {
        let run_args = self
            .run_args
            .as_deref()
            .map(split_run_args)
            .transpose()
            .map_err(|e| crate::RedeployError::InvalidSetting {
                field: "run_args",
                reason: e.to_string(),
            })?;

        Ok(Overrides {
            image: self.image.clone(),
            container: self.container.clone(),
            project_path: self.project_path.clone(),
            mount_target: self.mount_target.clone(),
            context: self.context.clone(),
            dockerfile: self.dockerfile.clone(),
            runtime: self.runtime.clone(),
            run_args,
            follow_logs: self.no_follow.then_some(false),
            log_file: self.log_file.clone(),
        })
    }

    /// Default tracing directive for the requested verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("redeploy").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn flags_become_overrides() {
        let args = parse(&["-i", "bot1img", "-c", "bot1", "-p", "/srv/bot", "--no-follow"]);
        let o = args.overrides().unwrap();
        assert_eq!(o.image.as_deref(), Some("bot1img"));
        assert_eq!(o.container.as_deref(), Some("bot1"));
        assert_eq!(o.project_path, Some(PathBuf::from("/srv/bot")));
        assert_eq!(o.follow_logs, Some(false));
    }

    #[test]
    fn follow_is_left_to_config_when_flag_absent() {
        let o = parse(&[]).overrides().unwrap();
        assert_eq!(o.follow_logs, None);
    }

    #[test]
    fn run_args_are_shell_split() {
        let args = parse(&["--run-args", "--restart unless-stopped -e 'A=b c'"]);
        let o = args.overrides().unwrap();
        assert_eq!(
            o.run_args,
            Some(vec![
                "--restart".to_string(),
                "unless-stopped".to_string(),
                "-e".to_string(),
                "A=b c".to_string(),
            ])
        );
    }

    #[test]
    fn unbalanced_run_args_are_rejected() {
        let args = parse(&["--run-args", "-e 'oops"]);
        assert!(args.overrides().is_err());
    }

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(parse(&[]).log_level(), tracing::Level::WARN);
        assert_eq!(parse(&["-v"]).log_level(), tracing::Level::INFO);
        assert_eq!(parse(&["-vvv"]).log_level(), tracing::Level::DEBUG);
    }
}
