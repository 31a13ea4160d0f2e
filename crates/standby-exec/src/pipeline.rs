use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use standby_model::TaskRequest;

use crate::error::ExecResult;
use crate::fetch::ScriptFetcher;
use crate::script::{ExecOutcome, ScriptRunner};

/// Fixed on-disk name for the downloaded script.
///
/// The declared `script_name` is never used as a path component, so an
/// attacker-controlled name cannot escape the work directory. The work
/// directory itself is wiped by the container restart that follows every
/// task, no cleanup is done here.
pub const SCRIPT_FILE: &str = "main.py";

/// Where the optional task payload is persisted for the child to read.
pub const PAYLOAD_FILE: &str = "task_payload.json";

#[derive(Clone, Debug)]
pub struct ExecConfig {
    pub work_dir: PathBuf,
    pub interpreter: String,
    pub timeout: Duration,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp"),
            interpreter: "python".to_string(),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Download-then-execute sequence for one accepted task.
pub struct ScriptPipeline {
    fetcher: ScriptFetcher,
    cfg: ExecConfig,
}

impl ScriptPipeline {
    pub fn new(cfg: ExecConfig) -> ExecResult<Self> {
        let fetcher = ScriptFetcher::new()?;
        Ok(Self { fetcher, cfg })
    }

    /// Fetch the script, persist the payload if any, run the script.
    ///
    /// The child sees `SCRIPT_URL` and, when a payload was supplied,
    /// `TASK_PAYLOAD_FILE` in its environment.
    pub async fn run_task(&self, task: &TaskRequest) -> ExecResult<ExecOutcome> {
        let script_path = self.cfg.work_dir.join(SCRIPT_FILE);

        info!(target: "standby.exec", url = %task.script_url, "downloading script");
        self.fetcher.fetch(&task.script_url, &script_path).await?;
        info!(target: "standby.exec", path = %script_path.display(), "script downloaded");

        let env = child_env(task, &self.cfg.work_dir).await?;

        info!(target: "standby.exec", timeout_secs = self.cfg.timeout.as_secs(), "executing script");
        let runner = ScriptRunner {
            interpreter: self.cfg.interpreter.clone(),
            timeout: self.cfg.timeout,
            env,
        };
        runner.execute(&script_path).await
    }
}

/// Build the child environment, persisting the payload file when present.
async fn child_env(task: &TaskRequest, work_dir: &Path) -> ExecResult<Vec<(String, String)>> {
    let mut env = vec![("SCRIPT_URL".to_string(), task.script_url.clone())];

    if let Some(payload) = &task.payload {
        let payload_path = work_dir.join(PAYLOAD_FILE);
        let data = serde_json::to_vec_pretty(payload)?;
        tokio::fs::write(&payload_path, data).await?;
        info!(target: "standby.exec", path = %payload_path.display(), "task payload saved");
        env.push((
            "TASK_PAYLOAD_FILE".to_string(),
            payload_path.to_string_lossy().into_owned(),
        ));
    }

    Ok(env)
}
