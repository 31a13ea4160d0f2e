use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, trace, warn};

use crate::error::{ExecError, ExecResult};
use crate::util::kill_graceful;

/// Upper bound on collecting the output tail of a killed child.
const DRAIN_CAP: Duration = Duration::from_secs(1);

/// Result of one script run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Exit code of the child; `None` when it was killed by a signal
    /// or by the deadline.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs a downloaded script as a child process under a deadline.
///
/// stdout and stderr are captured and streamed into the worker log so the
/// only observable trace of a task is the log stream. On deadline the child
/// is killed; that is fatal for the task but not for the worker process,
/// which proceeds to the restart step regardless.
pub struct ScriptRunner {
    pub interpreter: String,
    pub timeout: Duration,
    pub env: Vec<(String, String)>,
}

impl ScriptRunner {
    pub async fn execute(&self, script: &Path) -> ExecResult<ExecOutcome> {
        trace!(target: "standby.exec.script", interpreter = %self.interpreter, script = %script.display(), "spawn");

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(script);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecError::Spawn(e.to_string()))?;

        // Both pipes exist, we just asked for them.
        let read_stdout = stream_lines(child.stdout.take().unwrap(), false);
        let read_stderr = stream_lines(child.stderr.take().unwrap(), true);

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| ExecError::Wait(e.to_string()))?;
                // Drain the output tail before reporting.
                let _ = read_stdout.await;
                let _ = read_stderr.await;

                if let Some(code) = status.code() {
                    debug!(target: "standby.exec.script", code, "exit");
                    Ok(ExecOutcome { exit_code: Some(code), timed_out: false })
                } else {
                    debug!(target: "standby.exec.script", "terminated by signal");
                    Ok(ExecOutcome { exit_code: None, timed_out: false })
                }
            }
            _ = tokio::time::sleep(self.timeout) => {
                warn!(target: "standby.exec.script", timeout_secs = self.timeout.as_secs(), "deadline reached; killing child");
                let _ = kill_graceful(&mut child).await;
                // The kill closes the pipes; drain whatever the script
                // managed to write, but never past the drain cap.
                let drain = async {
                    let _ = read_stdout.await;
                    let _ = read_stderr.await;
                };
                if tokio::time::timeout(DRAIN_CAP, drain).await.is_err() {
                    debug!(target: "standby.exec.script", "output drain capped");
                }
                Ok(ExecOutcome { exit_code: None, timed_out: true })
            }
        }
    }
}

fn stream_lines<R>(pipe: R, is_err: bool) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(pipe).lines();
    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            if is_err {
                warn!(target: "standby.exec.script.err", %line);
            } else {
                info!(target: "standby.exec.script.out", %line);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Instant;

    fn write_script(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn sh_runner(timeout: Duration) -> ScriptRunner {
        ScriptRunner {
            interpreter: "sh".to_string(),
            timeout,
            env: Vec::new(),
        }
    }

    #[tokio::test]
    async fn clean_exit_reports_zero() {
        let script = write_script("echo hello\nexit 0\n");
        let outcome = sh_runner(Duration::from_secs(10))
            .execute(script.path())
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, Some(0));
        assert!(!outcome.timed_out);
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn failing_exit_reports_code() {
        let script = write_script("exit 3\n");
        let outcome = sh_runner(Duration::from_secs(10))
            .execute(script.path())
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, Some(3));
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn deadline_kills_the_child() {
        let script = write_script("sleep 30\n");
        let started = Instant::now();
        let outcome = sh_runner(Duration::from_millis(200))
            .execute(script.path())
            .await
            .unwrap();

        assert!(outcome.timed_out);
        assert_eq!(outcome.exit_code, None);
        assert!(!outcome.success());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn killed_child_output_is_drained_without_hanging() {
        // Chatty script that outlives the deadline: the timeout branch must
        // collect the buffered tail and still return promptly.
        let script = write_script("i=0\nwhile [ $i -lt 200 ]; do echo line-$i; i=$((i+1)); done\nsleep 30\n");
        let started = Instant::now();
        let outcome = sh_runner(Duration::from_millis(300))
            .execute(script.path())
            .await
            .unwrap();

        assert!(outcome.timed_out);
        assert!(started.elapsed() < Duration::from_millis(300) + DRAIN_CAP + Duration::from_secs(5));
    }

    #[tokio::test]
    async fn env_is_visible_to_the_child() {
        let script = write_script("test \"$TASK_MARKER\" = \"42\"\n");
        let runner = ScriptRunner {
            interpreter: "sh".to_string(),
            timeout: Duration::from_secs(10),
            env: vec![("TASK_MARKER".to_string(), "42".to_string())],
        };

        let outcome = runner.execute(script.path()).await.unwrap();
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_spawn_error() {
        let script = write_script("exit 0\n");
        let runner = ScriptRunner {
            interpreter: "definitely-not-an-interpreter".to_string(),
            timeout: Duration::from_secs(1),
            env: Vec::new(),
        };

        let err = runner.execute(script.path()).await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn(_)));
    }
}
