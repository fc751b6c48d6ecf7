//! @ai:module:intent Build-and-sweep driver for the rideable concurrency benchmark
//! @ai:module:layer application
//! @ai:module:public_api config, console, interrupt, menu, orchestrator, runner, scratch, sweep

pub mod config;
pub mod console;
pub mod interrupt;
pub mod menu;
pub mod orchestrator;
pub mod runner;
pub mod scratch;
pub mod sweep;

pub use config::HarnessConfig;
pub use interrupt::run_interruptible;
pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use menu::{MenuOutcome, TaskAction, TaskMenu};
pub use orchestrator::{Orchestrator, SessionOutcome};
pub use runner::{Invocation, ProcessRunner, ProcessStatus, RecordingRunner, SystemRunner};
pub use scratch::ScratchCleaner;
pub use sweep::{RunMode, SweepError, SweepExecutor, SweepPlan, SweepReport, SweepTuple};
