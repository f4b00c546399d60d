//! Rebuild a bot's container image, replace the running container, and
//! follow the new container's logs.
//!
//! Every step is delegated to a docker-compatible CLI:
//!
//! 1. look for a container with exactly the configured name,
//! 2. if found, stop and remove it, then force-remove its image,
//! 3. build the image from the build context,
//! 4. start a detached container with the project directory bind-mounted,
//! 5. follow its logs.
//!
//! ```no_run
//! use redeploy::config::Config;
//! use redeploy::docker::DockerCli;
//!
//! let cfg = Config {
//!     image: Some("bot1img".into()),
//!     container: Some("bot1".into()),
//!     project_path: Some("/srv/bot".into()),
//!     ..Config::default()
//! };
//! let deployment = cfg.resolve(std::path::Path::new("/srv")).unwrap();
//! let runtime = DockerCli::new(deployment.runtime.clone());
//! let report = redeploy::redeploy(&runtime, &deployment).unwrap();
//! std::process::exit(report.exit_code);
//! ```

pub mod cli;
pub mod config;
pub mod docker;
pub mod error;
pub mod pipeline;

pub use error::{RedeployError, Result};
pub use pipeline::{ContainerRuntime, RedeployReport, Step, redeploy};
