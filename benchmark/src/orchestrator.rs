//! @ai:module:intent Sequence the task menu, parameter prompts and sweep for one session
//! @ai:module:layer application
//! @ai:module:public_api Orchestrator, SessionOutcome
//! @ai:module:depends_on menu, sweep, console, ridespec
//! @ai:module:stateless false

use crate::config::HarnessConfig;
use crate::console::Console;
use crate::menu::{MenuOutcome, TaskMenu};
use crate::runner::ProcessRunner;
use crate::scratch::ScratchCleaner;
use crate::sweep::{RunMode, SweepError, SweepExecutor, SweepPlan, SweepReport};
use anyhow::Result;
use ridespec::{ParameterSet, SkipReason};
use std::path::PathBuf;
use std::sync::Arc;

/// Printed when the binary is absent at sweep time.
pub const MISSING_ARTIFACT_MESSAGE: &str = "Executable not found. Please compile first.";

/// @ai:intent How an interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Exit chosen, or input ended at a prompt.
    Cancelled,
    MissingArtifact(PathBuf),
    Completed(SweepReport),
}

/// @ai:intent One interactive session: menu, then parameters, then sweep
pub struct Orchestrator<R: ProcessRunner> {
    menu: TaskMenu<R>,
    executor: SweepExecutor<R>,
}

impl<R: ProcessRunner> Orchestrator<R> {
    pub fn new(menu: TaskMenu<R>, executor: SweepExecutor<R>) -> Self {
        Self { menu, executor }
    }

    /// @ai:intent Wire menu and executor to one runner and one scratch cleaner
    /// @ai:effects env
    pub fn from_config(runner: Arc<R>, config: &HarnessConfig) -> Self {
        let scratch = ScratchCleaner::new(&config.paths.scratch);
        for pattern in scratch.describe() {
            tracing::debug!("Scratch pattern: {}", pattern);
        }

        let menu = TaskMenu::with_scratch(runner.clone(), config, scratch.clone());
        let executor = SweepExecutor::new(
            runner,
            config.paths.binary.clone(),
            config.debugger.clone(),
            scratch,
        );

        Self::new(menu, executor)
    }

    /// @ai:intent Run the session to completion
    /// @ai:post no runs happen after Cancelled or MissingArtifact
    /// @ai:effects io, fs:write
    pub fn run(&self, console: &mut dyn Console) -> Result<SessionOutcome> {
        let mode = match self.menu.run(console)? {
            MenuOutcome::Cancelled => return Ok(SessionOutcome::Cancelled),
            MenuOutcome::Sweep(mode) => mode,
        };

        let Some(plan) = collect_plan(console)? else {
            return Ok(SessionOutcome::Cancelled);
        };

        self.sweep(console, &plan, mode)
    }

    /// @ai:intent Hand a resolved plan to the executor, reporting a missing binary
    /// @ai:effects io, fs:write
    fn sweep(
        &self,
        console: &mut dyn Console,
        plan: &SweepPlan,
        mode: RunMode,
    ) -> Result<SessionOutcome> {
        match self.executor.execute(plan, mode) {
            Ok(report) => Ok(SessionOutcome::Completed(report)),
            Err(SweepError::MissingArtifact(path)) => {
                console.say(MISSING_ARTIFACT_MESSAGE)?;
                Ok(SessionOutcome::MissingArtifact(path))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// @ai:intent Ask for rideables, tests and threads; None if input ends
/// @ai:effects io
pub fn collect_plan(console: &mut dyn Console) -> Result<Option<SweepPlan>> {
    let Some(rideables) = prompt_parameters(console, "Rideable no.?: ", "rideables")? else {
        return Ok(None);
    };
    let Some(tests) = prompt_parameters(console, "Test no.?: ", "tests")? else {
        return Ok(None);
    };
    let Some(threads) = prompt_parameters(console, "Thread num.?: ", "threads")? else {
        return Ok(None);
    };

    Ok(Some(SweepPlan::new(rideables, tests, threads)))
}

/// @ai:intent Re-prompt until the answer expands to at least one value
/// @ai:post Some(set) is never empty
/// @ai:effects io
fn prompt_parameters(
    console: &mut dyn Console,
    prompt: &str,
    label: &str,
) -> Result<Option<ParameterSet>> {
    loop {
        let Some(line) = console.prompt(prompt)? else {
            return Ok(None);
        };

        for skipped in ridespec::tokenize(&line).skipped {
            if skipped.reason == SkipReason::TooLarge {
                tracing::warn!(
                    "Ignoring {:?}: more than {} {}",
                    skipped.text,
                    ParameterSet::MAX_LEN,
                    label
                );
            }
        }

        let values = ridespec::parse(&line);
        if values.is_empty() {
            continue;
        }

        console.say(&format!("Running on {}: {:?}", label, values.as_slice()))?;
        return Ok(Some(values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ScriptedConsole, TerminalConsole};
    use crate::runner::RecordingRunner;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn config_in(dir: &std::path::Path) -> HarnessConfig {
        let mut config = HarnessConfig::default();
        config.paths.binary = dir.join("main");
        config.paths.scratch.clear();
        config.build.clear_screen = false;
        config
    }

    #[test]
    fn test_reprompts_until_non_empty() {
        let mut console = ScriptedConsole::new(["", "abc", "1-2", "3", "4,8"]);

        let plan = collect_plan(&mut console).unwrap().unwrap();

        assert_eq!(plan.rideables.as_slice(), &[1, 2]);
        assert_eq!(plan.tests.as_slice(), &[3]);
        assert_eq!(plan.threads.as_slice(), &[4, 8]);
        assert_eq!(
            console.prompts(),
            &["Rideable no.?: ", "Rideable no.?: ", "Rideable no.?: ", "Test no.?: ", "Thread num.?: "]
        );
        assert_eq!(
            console.messages(),
            &[
                "Running on rideables: [1, 2]",
                "Running on tests: [3]",
                "Running on threads: [4, 8]",
            ]
        );
    }

    #[test]
    fn test_oversized_range_reprompts() {
        let mut console = ScriptedConsole::new(["0-4294967295", "2", "3", "4"]);

        let plan = collect_plan(&mut console).unwrap().unwrap();

        assert_eq!(plan.rideables.as_slice(), &[2]);
        assert_eq!(console.prompts().len(), 4);
    }

    #[test]
    fn test_invalid_utf8_parameter_is_not_an_error() {
        let input = b"\xfe1\n1\n2\n3\n".to_vec();
        let mut console = TerminalConsole::with_io(Cursor::new(input), Vec::<u8>::new());

        let plan = collect_plan(&mut console).unwrap().unwrap();

        // U+FFFD is unrecognized text; the digit after it still counts.
        assert_eq!(plan.rideables.as_slice(), &[1]);
        assert_eq!(plan.tests.as_slice(), &[1]);
        assert_eq!(plan.threads.as_slice(), &[2]);
    }

    #[test]
    fn test_end_of_input_during_parameters_cancels() {
        let temp = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let orchestrator = Orchestrator::from_config(runner.clone(), &config_in(temp.path()));
        let mut console = ScriptedConsole::new(["u", "1", "x"]);

        let outcome = orchestrator.run(&mut console).unwrap();

        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_missing_binary_reported_after_parameters() {
        let temp = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let orchestrator = Orchestrator::from_config(runner.clone(), &config_in(temp.path()));
        let mut console = ScriptedConsole::new(["u", "1", "2", "3"]);

        let outcome = orchestrator.run(&mut console).unwrap();

        assert_eq!(outcome, SessionOutcome::MissingArtifact(temp.path().join("main")));
        assert!(runner.calls().is_empty());
        assert_eq!(console.messages().last().map(String::as_str), Some(MISSING_ARTIFACT_MESSAGE));
    }

    fn built_config(temp: &TempDir) -> HarnessConfig {
        let config = config_in(temp.path());
        std::fs::write(&config.paths.binary, b"").unwrap();
        config
    }

    #[test]
    fn test_exit_first_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let orchestrator = Orchestrator::from_config(runner.clone(), &built_config(&temp));
        let mut console = ScriptedConsole::new(["x", "1", "2", "3"]);

        let outcome = orchestrator.run(&mut console).unwrap();

        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert!(runner.calls().is_empty());
        assert_eq!(console.remaining(), 3);
    }

    #[test]
    fn test_full_sweep_in_order() {
        let temp = TempDir::new().unwrap();
        let config = built_config(&temp);
        let bin = config.paths.binary.display().to_string();
        let runner = Arc::new(RecordingRunner::new());
        let orchestrator = Orchestrator::from_config(runner.clone(), &config);
        let mut console = ScriptedConsole::new(["u", "1-2", "3", "4,5"]);

        let outcome = orchestrator.run(&mut console).unwrap();

        assert_eq!(
            outcome,
            SessionOutcome::Completed(SweepReport {
                attempted: 4,
                failed: 0,
                unstarted: 0
            })
        );
        assert_eq!(
            runner.command_lines(),
            vec![
                format!("{} -r 1 -m 3 -t 4", bin),
                format!("{} -r 1 -m 3 -t 5", bin),
                format!("{} -r 2 -m 3 -t 4", bin),
                format!("{} -r 2 -m 3 -t 5", bin),
            ]
        );
    }

    #[test]
    fn test_failing_runs_do_not_stop_sweep() {
        let temp = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::with_exit_codes([1, 139, 0]));
        let orchestrator = Orchestrator::from_config(runner.clone(), &built_config(&temp));
        let mut console = ScriptedConsole::new(["u", "1,2,3", "0", "1"]);

        let outcome = orchestrator.run(&mut console).unwrap();

        assert_eq!(
            outcome,
            SessionOutcome::Completed(SweepReport {
                attempted: 3,
                failed: 2,
                unstarted: 0
            })
        );
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn test_build_then_debug_sweep() {
        let temp = TempDir::new().unwrap();
        let config = built_config(&temp);
        let bin = config.paths.binary.display().to_string();
        let runner = Arc::new(RecordingRunner::new());
        let orchestrator = Orchestrator::from_config(runner.clone(), &config);
        let mut console = ScriptedConsole::new(["d", "g", "7", "1", "2"]);

        orchestrator.run(&mut console).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "make -j10 BUILD=debug".to_string(),
                format!("{} > nums.txt 2>&1", bin),
                format!("gdb -ex run -ex bt --args {} -r 7 -m 1 -t 2", bin),
            ]
        );
    }

    #[test]
    fn test_scratch_purged_before_each_run() {
        let temp = TempDir::new().unwrap();
        let scratch = temp.path().join("pmem");
        std::fs::create_dir(&scratch).unwrap();

        let mut config = built_config(&temp);
        config.paths.scratch = vec![crate::config::ScratchPattern {
            dir: scratch.clone(),
            pattern: "heap*".to_string(),
        }];
        std::fs::write(scratch.join("heap0"), b"x").unwrap();
        std::fs::write(scratch.join("keep"), b"x").unwrap();

        let runner = Arc::new(RecordingRunner::new());
        let orchestrator = Orchestrator::from_config(runner.clone(), &config);
        let mut console = ScriptedConsole::new(["u", "1", "1", "1"]);

        orchestrator.run(&mut console).unwrap();

        assert!(!scratch.join("heap0").exists());
        assert!(scratch.join("keep").exists());
        assert_eq!(runner.calls().len(), 1);
    }
}
