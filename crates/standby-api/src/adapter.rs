use async_trait::async_trait;
use tracing::{error, info, warn};

use standby_exec::{ScriptPipeline, restart};
use standby_model::TaskRequest;

use crate::launcher::TaskLauncher;

/// Production [`TaskLauncher`]: runs the download-and-execute pipeline, then
/// terminates the worker process so the supervisor restarts it with a clean
/// slate. The exit code is 0 only when the script itself exited 0.
pub struct PipelineLauncher {
    pipeline: ScriptPipeline,
}

impl PipelineLauncher {
    pub fn new(pipeline: ScriptPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl TaskLauncher for PipelineLauncher {
    async fn run(&self, task: TaskRequest) {
        let code = match self.pipeline.run_task(&task).await {
            Ok(outcome) if outcome.success() => {
                info!(target: "standby.api", "script completed successfully");
                0
            }
            Ok(outcome) if outcome.timed_out => {
                warn!(target: "standby.api", "script timed out");
                1
            }
            Ok(outcome) => {
                error!(target: "standby.api", code = ?outcome.exit_code, "script failed");
                1
            }
            Err(err) => {
                error!(target: "standby.api", error = %err, "task execution failed");
                1
            }
        };

        restart(code).await
    }
}
