use std::path::PathBuf;
use std::process::ExitStatus;

/// Describes a runtime invocation. The `args` field is the full argument list
/// passed to the runtime binary (the pipeline layer is responsible for
/// assembling it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCommand {
    pub args: Vec<String>,
    /// Also append every output line to this file.
    pub log_path: Option<PathBuf>,
}

impl ContainerCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            log_path: None,
        }
    }

    pub fn with_log_path(mut self, path: Option<PathBuf>) -> Self {
        self.log_path = path;
        self
    }

    /// Render as a copy-pasteable shell line, prefixed with the runtime binary.
    pub fn display_with(&self, program: &str) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(program);
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// Outcome of a streamed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerResult {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ContainerResult {
    pub fn from_code(exit_code: Option<i32>) -> Self {
        Self {
            success: exit_code == Some(0),
            exit_code,
        }
    }
}

impl From<ExitStatus> for ContainerResult {
    fn from(status: ExitStatus) -> Self {
        Self::from_code(status.code())
    }
}

/// Outcome of a captured invocation: exit code plus everything on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub exit_code: Option<i32>,
    pub stdout: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Streamed output from a running runtime process.
#[derive(Debug)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
    Done(ContainerResult),
}
