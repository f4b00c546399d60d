use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use redeploy::cli::Args;
use redeploy::config::{self, Deployment};
use redeploy::docker::{self, DockerCli};
use redeploy::pipeline;
use redeploy::RedeployError;

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(code) => exit_code(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<RedeployError>()
                .map_or(1, RedeployError::exit_code);
            exit_code(code)
        }
    }
}

fn run(args: &Args) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let deployment = load_deployment(args, &cwd)?;

    if args.dry_run {
        print_plan(&deployment)?;
        return Ok(0);
    }

    docker::ensure_available(&deployment.runtime)?;

    let runtime = DockerCli::new(deployment.runtime.clone());
    let report = pipeline::redeploy(&runtime, &deployment)?;
    tracing::info!(
        replaced = report.replaced_existing,
        exit_code = report.exit_code,
        "redeploy finished"
    );
    Ok(report.exit_code)
}

/// Defaults, then the config file, then flags and environment.
fn load_deployment(args: &Args, cwd: &Path) -> Result<Deployment> {
    let mut cfg = match &args.config {
        Some(path) => config::load_file(path)?,
        None => config::load(cwd)?.unwrap_or_default(),
    };
    cfg.apply(args.overrides()?);
    tracing::debug!(?cfg, "effective config");
    Ok(cfg.resolve(cwd)?)
}

fn print_plan(d: &Deployment) -> Result<()> {
    let mut out = io::stdout().lock();
    for planned in pipeline::plan(d) {
        let line = planned.command.display_with(&d.runtime);
        if planned.step.is_teardown() {
            writeln!(out, "{line}    # if container {} exists", d.container)?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    // ExitCode carries a single byte.
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
