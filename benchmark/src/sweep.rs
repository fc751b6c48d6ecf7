//! @ai:module:intent Run the benchmark binary once per rideable × test × thread tuple
//! @ai:module:layer application
//! @ai:module:public_api RunMode, SweepPlan, SweepTuple, SweepExecutor, SweepReport, SweepError
//! @ai:module:depends_on runner, scratch, config
//! @ai:module:stateless false

use crate::config::{DebuggerConfig, HarnessConfig};
use crate::runner::{Invocation, ProcessRunner};
use crate::scratch::ScratchCleaner;
use ridespec::ParameterSet;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// @ai:intent Conditions that stop a sweep before its first run
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Executable not found at {0}. Please compile first.")]
    MissingArtifact(PathBuf),

    #[error("Run-with-debugger requested but the debugger action is disabled")]
    DebuggerDisabled,
}

/// @ai:intent How each tuple is launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Run,
    RunDebug,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Run => "run",
            RunMode::RunDebug => "run-debug",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent One point of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepTuple {
    pub rideable: u32,
    pub test: u32,
    pub threads: u32,
}

/// @ai:intent The three parameter axes of a sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepPlan {
    pub rideables: ParameterSet,
    pub tests: ParameterSet,
    pub threads: ParameterSet,
}

impl SweepPlan {
    pub fn new(rideables: ParameterSet, tests: ParameterSet, threads: ParameterSet) -> Self {
        Self {
            rideables,
            tests,
            threads,
        }
    }

    /// @ai:intent Number of tuples in the Cartesian product
    /// @ai:effects pure
    pub fn len(&self) -> usize {
        self.rideables
            .len()
            .saturating_mul(self.tests.len())
            .saturating_mul(self.threads.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// @ai:intent Tuples with rideable outermost and thread count innermost
    /// @ai:example ([1,2], [3], [4,5]) -> (1,3,4) (1,3,5) (2,3,4) (2,3,5)
    /// @ai:effects pure
    pub fn tuples(&self) -> impl Iterator<Item = SweepTuple> + '_ {
        self.rideables.iter().flat_map(move |&rideable| {
            self.tests.iter().flat_map(move |&test| {
                self.threads.iter().map(move |&threads| SweepTuple {
                    rideable,
                    test,
                    threads,
                })
            })
        })
    }
}

/// @ai:intent Outcome counts of a finished sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub attempted: usize,
    /// Ran but exited non-zero or by signal.
    pub failed: usize,
    /// Could not be started at all.
    pub unstarted: usize,
}

/// @ai:intent Drives the benchmark binary across a sweep plan
pub struct SweepExecutor<R: ProcessRunner> {
    runner: Arc<R>,
    binary: PathBuf,
    debugger: DebuggerConfig,
    scratch: ScratchCleaner,
}

impl<R: ProcessRunner> SweepExecutor<R> {
    /// @ai:intent Create an executor from explicit parts
    /// @ai:effects pure
    pub fn new(
        runner: Arc<R>,
        binary: PathBuf,
        debugger: DebuggerConfig,
        scratch: ScratchCleaner,
    ) -> Self {
        Self {
            runner,
            binary,
            debugger,
            scratch,
        }
    }

    /// @ai:intent Create an executor from harness configuration
    /// @ai:effects env
    pub fn from_config(runner: Arc<R>, config: &HarnessConfig) -> Self {
        Self::new(
            runner,
            config.paths.binary.clone(),
            config.debugger.clone(),
            ScratchCleaner::new(&config.paths.scratch),
        )
    }

    /// @ai:intent Bind one tuple to the binary's flags, wrapping in the debugger if asked
    /// @ai:effects pure
    pub fn invocation(&self, tuple: SweepTuple, mode: RunMode) -> Invocation {
        let flags = [
            "-r".to_string(),
            tuple.rideable.to_string(),
            "-m".to_string(),
            tuple.test.to_string(),
            "-t".to_string(),
            tuple.threads.to_string(),
        ];
        let binary = self.binary.display().to_string();

        match mode {
            RunMode::Run => Invocation::new(binary).args(flags),
            RunMode::RunDebug => Invocation::new(self.debugger.program.clone())
                .args(self.debugger.args.iter().cloned())
                .arg(binary)
                .args(flags),
        }
    }

    /// @ai:intent Every invocation the sweep would make, in order
    /// @ai:effects pure
    pub fn plan_invocations(&self, plan: &SweepPlan, mode: RunMode) -> Vec<Invocation> {
        plan.tuples().map(|t| self.invocation(t, mode)).collect()
    }

    /// @ai:intent Check that the sweep may start at all
    /// @ai:effects fs:read
    pub fn check_preconditions(&self, mode: RunMode) -> Result<(), SweepError> {
        if mode == RunMode::RunDebug && !self.debugger.enabled {
            return Err(SweepError::DebuggerDisabled);
        }

        if !self.binary.is_file() {
            return Err(SweepError::MissingArtifact(self.binary.clone()));
        }

        Ok(())
    }

    /// @ai:intent Run every tuple once, continuing past failures
    /// @ai:pre the binary exists
    /// @ai:post attempted == plan.len() unless a precondition failed
    /// @ai:effects fs:write, io
    pub fn execute(&self, plan: &SweepPlan, mode: RunMode) -> Result<SweepReport, SweepError> {
        self.check_preconditions(mode)?;

        let total = plan.len();
        let mut report = SweepReport::default();

        for (i, tuple) in plan.tuples().enumerate() {
            self.scratch.purge();

            let invocation = self.invocation(tuple, mode);
            tracing::info!(
                "[{}/{}] rideable={} test={} threads={} ({})",
                i + 1,
                total,
                tuple.rideable,
                tuple.test,
                tuple.threads,
                mode
            );

            report.attempted += 1;
            match self.runner.run(&invocation) {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    tracing::warn!("{} finished with {}", invocation, status);
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.unstarted += 1;
                }
            }
        }

        tracing::info!(
            "Sweep finished: {} runs, {} failed, {} not started",
            report.attempted,
            report.failed,
            report.unstarted
        );

        Ok(report)
    }
}
