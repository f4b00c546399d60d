// Container runtime invocation — captured queries, streamed steps, availability.

pub mod engine;
pub mod run;
pub mod types;

pub use engine::{DockerCli, ensure_available};
pub use run::spawn;
pub use types::{Captured, ContainerCommand, ContainerResult, OutputLine};
