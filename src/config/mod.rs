// Deployment settings — defaults, the YAML config file, and flag/env overrides.

mod loader;
mod types;

pub use loader::{CONFIG_FILE, load, load_file};
pub use types::{Config, Deployment, Overrides, split_run_args};
