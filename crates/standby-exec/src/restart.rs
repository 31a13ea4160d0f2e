use std::time::Duration;

use tracing::info;

/// Grace period before exiting, so the log tail reaches the collector.
pub const FLUSH_DELAY: Duration = Duration::from_secs(2);

/// Terminate the worker process to force a container restart.
///
/// This is the only way a task ever "completes": rather than resetting
/// in-memory state for the next task, the whole process is discarded and the
/// external supervisor starts a fresh one with a clean memory and browser
/// profile slate. No in-process state survives across tasks. The exit code
/// tells the supervisor whether the task succeeded, nothing more.
pub async fn restart(code: i32) -> ! {
    info!(target: "standby.exec", code, "triggering worker restart");
    tokio::time::sleep(FLUSH_DELAY).await;
    std::process::exit(code)
}
