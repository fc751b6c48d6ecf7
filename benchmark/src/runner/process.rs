//! @ai:module:intent Run external commands synchronously and report their exit status
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProcessRunner, SystemRunner, Invocation, ProcessStatus, RunnerError
//! @ai:module:stateless true

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// @ai:intent Failure to start an external command at all
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// @ai:intent A fully-bound external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Combined stdout/stderr go here, truncating it first.
    pub log_file: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            log_file: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn redirect_to(mut self, path: impl AsRef<Path>) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }
}

/// Shell-like rendering, used for logs and dry runs.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some(log) = &self.log_file {
            write!(f, " > {} 2>&1", log.display())?;
        }
        Ok(())
    }
}

/// @ai:intent Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// @ai:intent Capability to run one command to completion
pub trait ProcessRunner: Send + Sync {
    /// @ai:intent Run the invocation synchronously and return its exit status
    fn run(&self, invocation: &Invocation) -> Result<ProcessStatus, RunnerError>;
}

/// @ai:intent Runs commands as real child processes inheriting the terminal
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for SystemRunner {
    /// @ai:intent Spawn the command and block until it exits
    /// @ai:effects io, fs:write
    fn run(&self, invocation: &Invocation) -> Result<ProcessStatus, RunnerError> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);

        if let Some(path) = &invocation.log_file {
            let log_error = |source| RunnerError::LogFile {
                path: path.clone(),
                source,
            };
            let stdout = File::create(path).map_err(log_error)?;
            let stderr = stdout.try_clone().map_err(log_error)?;
            command.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
        }

        let status = command.status().map_err(|source| RunnerError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        Ok(ProcessStatus {
            code: status.code(),
        })
    }
}
