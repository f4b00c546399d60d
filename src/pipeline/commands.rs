use crate::config::Deployment;
use crate::docker::ContainerCommand;

/// List containers (running or not) whose name matches exactly.
///
/// The runtime's name filter is a regex; anchoring it only narrows the
/// listing, the caller still compares each name for equality.
pub fn inspect_command(d: &Deployment) -> ContainerCommand {
    ContainerCommand::new([
        "ps".to_string(),
        "-a".to_string(),
        "--filter".to_string(),
        format!("name=^{}$", d.container),
        "--format".to_string(),
        "{{.Names}}".to_string(),
    ])
}

pub fn stop_command(d: &Deployment) -> ContainerCommand {
    ContainerCommand::new(["stop", d.container.as_str()])
}

pub fn remove_command(d: &Deployment) -> ContainerCommand {
    ContainerCommand::new(["rm", d.container.as_str()])
}

/// Force flag: an image still referenced elsewhere is untagged instead of
/// failing the removal.
pub fn remove_image_command(d: &Deployment) -> ContainerCommand {
    ContainerCommand::new(["rmi", "-f", d.image.as_str()])
}

pub fn build_command(d: &Deployment) -> ContainerCommand {
    let mut args = vec!["build".to_string(), "-t".to_string(), d.image.clone()];
    if let Some(dockerfile) = &d.dockerfile {
        args.extend(["-f".to_string(), dockerfile.display().to_string()]);
    }
    args.push(d.context.display().to_string());
    ContainerCommand::new(args)
}

/// Build a detached `run` with the project directory bind-mounted.
pub fn run_command(d: &Deployment) -> ContainerCommand {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--name".to_string(),
        d.container.clone(),
        "-v".to_string(),
        format!("{}:{}", d.project_path.display(), d.mount_target),
    ];
    args.extend(d.run_args.iter().cloned());
    args.push(d.image.clone());
    ContainerCommand::new(args)
}

pub fn logs_command(d: &Deployment) -> ContainerCommand {
    ContainerCommand::new(["logs", "-f", d.container.as_str()]).with_log_path(d.log_file.clone())
}

/// True if any line of `ps --format {{.Names}}` output is exactly `name`.
pub fn listing_contains(stdout: &str, name: &str) -> bool {
    stdout.lines().any(|line| line.trim() == name)
}
