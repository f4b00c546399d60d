use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Step;

#[derive(Debug, Error)]
pub enum RedeployError {
    #[error("missing required setting `{field}` (pass --{flag} or set `{field}` in the config file)")]
    MissingSetting {
        field: &'static str,
        flag: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("failed to read config {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to invoke `{program}` for {step}")]
    Spawn {
        program: String,
        step: Step,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} failed ({})", describe_exit(.exit_code))]
    StepFailed { step: Step, exit_code: Option<i32> },
}

impl RedeployError {
    /// Process exit status to report for this error.
    ///
    /// A failed step passes through the runtime's own exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            RedeployError::StepFailed {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, RedeployError>;
