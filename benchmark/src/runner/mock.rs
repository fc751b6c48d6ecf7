//! @ai:module:intent Test runner that records invocations instead of starting them
//! @ai:module:layer infrastructure
//! @ai:module:public_api RecordingRunner
//! @ai:module:stateless false

use crate::runner::process::{Invocation, ProcessRunner, ProcessStatus, RunnerError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// @ai:intent Records every invocation and answers with scripted exit codes
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    script: Mutex<VecDeque<i32>>,
    unavailable: Vec<String>,
}

impl RecordingRunner {
    /// @ai:intent Create a runner where every command succeeds
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            unavailable: Vec::new(),
        }
    }

    /// @ai:intent Answer successive calls with these codes, then with 0
    /// @ai:effects pure
    pub fn with_exit_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            script: Mutex::new(codes.into_iter().collect()),
            ..Self::new()
        }
    }

    /// @ai:intent Make every call to `program` fail to spawn
    /// @ai:effects pure
    pub fn without_program(mut self, program: impl Into<String>) -> Self {
        self.unavailable.push(program.into());
        self
    }

    /// @ai:intent Snapshot of invocations so far, in call order
    /// @ai:effects state:read
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// @ai:intent Invocations rendered as shell-like strings
    /// @ai:effects state:read
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for RecordingRunner {
    /// @ai:effects state:write
    fn run(&self, invocation: &Invocation) -> Result<ProcessStatus, RunnerError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }

        if self.unavailable.contains(&invocation.program) {
            return Err(RunnerError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }

        let code = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(0);

        Ok(ProcessStatus::from_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_codes_then_success() {
        let runner = RecordingRunner::with_exit_codes([2, 0, 1]);
        let invocation = Invocation::new("make");

        let codes: Vec<Option<i32>> = (0..4)
            .map(|_| runner.run(&invocation).unwrap().code)
            .collect();

        assert_eq!(codes, vec![Some(2), Some(0), Some(1), Some(0)]);
        assert_eq!(runner.calls().len(), 4);
    }

    #[test]
    fn test_unavailable_program_still_recorded() {
        let runner = RecordingRunner::new().without_program("gdb");
        assert!(runner.run(&Invocation::new("gdb")).is_err());
        assert!(runner.run(&Invocation::new("make")).is_ok());
        assert_eq!(runner.command_lines(), vec!["gdb", "make"]);
    }
}
