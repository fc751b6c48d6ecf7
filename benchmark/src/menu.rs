//! @ai:module:intent Interactive task menu: clean, build, or pick a sweep mode
//! @ai:module:layer application
//! @ai:module:public_api TaskAction, MenuOutcome, TaskMenu
//! @ai:module:depends_on runner, scratch, console, config
//! @ai:module:stateless false

use crate::config::{BuildConfig, HarnessConfig};
use crate::console::Console;
use crate::runner::{Invocation, ProcessRunner, ProcessStatus};
use crate::scratch::ScratchCleaner;
use crate::sweep::RunMode;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// @ai:intent One entry of the task menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Clean,
    BuildRelease,
    BuildDebug,
    Run,
    RunDebug,
    Exit,
}

impl TaskAction {
    /// @ai:intent Map an input code to an action
    /// @ai:post `g` is only recognized when the debugger action is enabled
    /// @ai:example ("c", true) -> Some(Clean)
    /// @ai:example ("g", false) -> None
    /// @ai:example ("hello", true) -> None
    /// @ai:effects pure
    pub fn from_input(input: &str, debugger_enabled: bool) -> Option<Self> {
        match input.trim() {
            "c" => Some(TaskAction::Clean),
            "r" => Some(TaskAction::BuildRelease),
            "d" => Some(TaskAction::BuildDebug),
            "u" => Some(TaskAction::Run),
            "g" if debugger_enabled => Some(TaskAction::RunDebug),
            "x" => Some(TaskAction::Exit),
            _ => None,
        }
    }

    /// @ai:intent True for actions that leave the menu loop
    /// @ai:effects pure
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskAction::Run | TaskAction::RunDebug | TaskAction::Exit)
    }
}

/// @ai:intent How the menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Sweep(RunMode),
    Cancelled,
}

/// @ai:intent Loops over the task prompt, running clean and build actions in place
pub struct TaskMenu<R: ProcessRunner> {
    runner: Arc<R>,
    build: BuildConfig,
    binary: PathBuf,
    log_file: PathBuf,
    debugger_enabled: bool,
    scratch: ScratchCleaner,
}

impl<R: ProcessRunner> TaskMenu<R> {
    /// @ai:intent Create a menu with an already-compiled scratch cleaner
    /// @ai:effects pure
    pub fn with_scratch(runner: Arc<R>, config: &HarnessConfig, scratch: ScratchCleaner) -> Self {
        Self {
            runner,
            build: config.build.clone(),
            binary: config.paths.binary.clone(),
            log_file: config.paths.log_file.clone(),
            debugger_enabled: config.debugger.enabled,
            scratch,
        }
    }

    /// @ai:intent The prompt line listing available actions
    /// @ai:effects pure
    pub fn prompt_text(&self) -> String {
        if self.debugger_enabled {
            "Task? <(c)lean | compile-(r)elease | compile-(d)ebug | r(u)n | run-(g)db | e(x)it>: "
                .to_string()
        } else {
            "Task? <(c)lean | compile-(r)elease | compile-(d)ebug | r(u)n | e(x)it>: ".to_string()
        }
    }

    /// @ai:intent Prompt until a terminal action is chosen or input ends
    /// @ai:post unrecognized input is ignored silently
    /// @ai:effects io, fs:write
    pub fn run(&self, console: &mut dyn Console) -> Result<MenuOutcome> {
        let prompt = self.prompt_text();

        loop {
            let Some(line) = console.prompt(&prompt)? else {
                return Ok(MenuOutcome::Cancelled);
            };

            let Some(action) = TaskAction::from_input(&line, self.debugger_enabled) else {
                continue;
            };

            if !action.is_terminal() {
                self.apply(action);
                continue;
            }

            return Ok(match action {
                TaskAction::Run => MenuOutcome::Sweep(RunMode::Run),
                TaskAction::RunDebug => MenuOutcome::Sweep(RunMode::RunDebug),
                _ => MenuOutcome::Cancelled,
            });
        }
    }

    /// @ai:intent Perform the side effects of a non-terminal action
    /// @ai:effects io, fs:write
    pub fn apply(&self, action: TaskAction) {
        match action {
            TaskAction::Clean => self.clean(),
            TaskAction::BuildRelease => self.build(false),
            TaskAction::BuildDebug => self.build(true),
            TaskAction::Run | TaskAction::RunDebug | TaskAction::Exit => {}
        }
    }

    fn clean(&self) {
        let purged = self.scratch.purge();
        tracing::info!("Cleaning build outputs ({} scratch entries removed)", purged);

        let clean = Invocation::new(self.build.program.clone()).arg(self.build.clean_target.clone());
        if self.succeeded(&clean) {
            self.clear_screen();
        }
    }

    /// @ai:intent Build, then run the binary once into the log file if the build passed
    /// @ai:effects io, fs:write
    fn build(&self, debug: bool) {
        let mode = if debug { "debug" } else { "release" };
        tracing::info!("Building ({})", mode);

        let build = Invocation::new(self.build.program.clone()).args(self.build.build_args(debug));
        if !self.succeeded(&build) {
            tracing::warn!("Build ({}) failed, skipping post-build run", mode);
            return;
        }

        if !self.build.run_after_build {
            return;
        }

        let smoke = Invocation::new(self.binary.display().to_string()).redirect_to(&self.log_file);
        if self.succeeded(&smoke) {
            self.clear_screen();
        } else {
            tracing::warn!("Post-build run failed, see {}", self.log_file.display());
        }
    }

    fn clear_screen(&self) {
        if self.build.clear_screen {
            self.succeeded(&Invocation::new(self.build.clear_program.clone()));
        }
    }

    /// @ai:intent Run a command, folding spawn failures into "did not succeed"
    /// @ai:effects io
    fn succeeded(&self, invocation: &Invocation) -> bool {
        match self.runner.run(invocation) {
            Ok(status) => {
                log_status(invocation, status);
                status.success()
            }
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }
}

fn log_status(invocation: &Invocation, status: ProcessStatus) {
    if status.success() {
        tracing::debug!("{} succeeded", invocation);
    } else {
        tracing::warn!("{} finished with {}", invocation, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ScriptedConsole, TerminalConsole};
    use crate::runner::RecordingRunner;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn quiet_config() -> HarnessConfig {
        let mut config = HarnessConfig::default();
        config.paths.scratch.clear();
        config
    }

    fn make_menu(runner: &Arc<RecordingRunner>, config: &HarnessConfig) -> TaskMenu<RecordingRunner> {
        TaskMenu::with_scratch(runner.clone(), config, ScratchCleaner::default())
    }

    #[test]
    fn test_action_codes() {
        assert_eq!(TaskAction::from_input("c", true), Some(TaskAction::Clean));
        assert_eq!(TaskAction::from_input(" r\n", true), Some(TaskAction::BuildRelease));
        assert_eq!(TaskAction::from_input("d", true), Some(TaskAction::BuildDebug));
        assert_eq!(TaskAction::from_input("u", true), Some(TaskAction::Run));
        assert_eq!(TaskAction::from_input("g", true), Some(TaskAction::RunDebug));
        assert_eq!(TaskAction::from_input("x", true), Some(TaskAction::Exit));
        assert_eq!(TaskAction::from_input("g", false), None);
        assert_eq!(TaskAction::from_input("clean", true), None);
    }

    #[test]
    fn test_terminal_actions() {
        assert!(TaskAction::Exit.is_terminal());
        assert!(TaskAction::RunDebug.is_terminal());
        assert!(!TaskAction::BuildDebug.is_terminal());
    }

    #[test]
    fn test_exit_first_runs_nothing() {
        let runner = Arc::new(RecordingRunner::new());
        let mut console = ScriptedConsole::new(["x"]);

        let outcome = make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(outcome, MenuOutcome::Cancelled);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_end_of_input_cancels() {
        let runner = Arc::new(RecordingRunner::new());
        let mut console = ScriptedConsole::new(["?", "zzz"]);

        let outcome = make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(outcome, MenuOutcome::Cancelled);
        assert_eq!(console.prompts().len(), 3);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_invalid_utf8_input_is_ignored() {
        let runner = Arc::new(RecordingRunner::new());
        let mut console =
            TerminalConsole::with_io(Cursor::new(b"\xff\nx\n".to_vec()), Vec::<u8>::new());

        let outcome = make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(outcome, MenuOutcome::Cancelled);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_clean_then_run() {
        let runner = Arc::new(RecordingRunner::new());
        let mut console = ScriptedConsole::new(["c", "u"]);

        let outcome = make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(outcome, MenuOutcome::Sweep(RunMode::Run));
        assert_eq!(runner.command_lines(), vec!["make clean", "clear"]);
    }

    #[test]
    fn test_release_build_runs_binary_into_log() {
        let runner = Arc::new(RecordingRunner::new());
        let mut console = ScriptedConsole::new(["r", "x"]);

        make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["make -j10", "./bin/main > nums.txt 2>&1", "clear"]
        );
    }

    #[test]
    fn test_debug_build_passes_flag() {
        let runner = Arc::new(RecordingRunner::new());
        let mut config = quiet_config();
        config.build.clear_screen = false;
        let mut console = ScriptedConsole::new(["d", "g"]);

        let outcome = make_menu(&runner, &config).run(&mut console).unwrap();

        assert_eq!(outcome, MenuOutcome::Sweep(RunMode::RunDebug));
        assert_eq!(
            runner.command_lines(),
            vec!["make -j10 BUILD=debug", "./bin/main > nums.txt 2>&1"]
        );
    }

    #[test]
    fn test_failed_build_skips_post_build_run() {
        let runner = Arc::new(RecordingRunner::with_exit_codes([2]));
        let mut console = ScriptedConsole::new(["r", "x"]);

        make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(runner.command_lines(), vec!["make -j10"]);
    }

    #[test]
    fn test_failed_post_build_run_skips_clear() {
        let runner = Arc::new(RecordingRunner::with_exit_codes([0, 1]));
        let mut console = ScriptedConsole::new(["r", "x"]);

        make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["make -j10", "./bin/main > nums.txt 2>&1"]
        );
    }

    #[test]
    fn test_missing_make_does_not_abort_menu() {
        let runner = Arc::new(RecordingRunner::new().without_program("make"));
        let mut console = ScriptedConsole::new(["r", "c", "u"]);

        let outcome = make_menu(&runner, &quiet_config()).run(&mut console).unwrap();

        assert_eq!(outcome, MenuOutcome::Sweep(RunMode::Run));
        assert_eq!(runner.command_lines(), vec!["make -j10", "make clean"]);
    }

    #[test]
    fn test_gdb_ignored_when_debugger_disabled() {
        let runner = Arc::new(RecordingRunner::new());
        let mut config = quiet_config();
        config.debugger.enabled = false;
        let mut console = ScriptedConsole::new(["g", "u"]);

        let menu = make_menu(&runner, &config);
        assert!(!menu.prompt_text().contains("(g)db"));

        let outcome = menu.run(&mut console).unwrap();
        assert_eq!(outcome, MenuOutcome::Sweep(RunMode::Run));
    }
}
