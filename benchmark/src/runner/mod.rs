//! @ai:module:intent External process execution for build, benchmark and debugger runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProcessRunner, SystemRunner, RecordingRunner, Invocation, ProcessStatus

pub mod mock;
pub mod process;

pub use mock::RecordingRunner;
pub use process::{Invocation, ProcessRunner, ProcessStatus, RunnerError, SystemRunner};
