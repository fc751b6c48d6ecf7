//! @ai:module:intent Run a blocking session that Ctrl-C ends quietly
//! @ai:module:layer infrastructure
//! @ai:module:public_api run_interruptible
//! @ai:module:stateless true

use anyhow::{Context, Result};

/// @ai:intent Run a blocking job, abandoning it quietly on Ctrl-C
/// @ai:post Ok(None) means the operator interrupted; the job thread is left behind
/// @ai:effects io
pub fn run_interruptible<T, F>(job: F) -> Result<Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to start signal runtime")?;

    let finished = runtime.block_on(async move {
        let session = tokio::task::spawn_blocking(job);

        tokio::select! {
            joined = session => joined.map(Some).context("Session thread panicked"),
            _ = tokio::signal::ctrl_c() => Ok(None),
        }
    });

    // The session thread may still be blocked reading stdin.
    runtime.shutdown_background();

    match finished? {
        Some(result) => result.map(Some),
        None => {
            tracing::debug!("Interrupted by operator");
            Ok(None)
        }
    }
}
