use async_trait::async_trait;
use standby_model::TaskRequest;

/// Background execution of one accepted task.
///
/// Fire-and-forget seam between the HTTP surface and the execution pipeline:
/// the dispatching handler never awaits the launcher, and nothing a launcher
/// does is surfaced to the HTTP caller. Failures are observable only through
/// logs and the worker restart that follows every task.
#[async_trait]
pub trait TaskLauncher: Send + Sync + 'static {
    async fn run(&self, task: TaskRequest);
}
