mod config;

use anyhow::Context;
use tracing::{info, warn};

use standby_api::{HttpApi, PipelineLauncher};
use standby_exec::{ExecConfig, ScriptPipeline};
use standby_observe::{LoggerConfig, logger_init};

use crate::config::StandbyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = StandbyConfig::from_env().context("invalid configuration")?;

    logger_init(&LoggerConfig {
        format: cfg.log_format,
        level: cfg.log_level.clone(),
        ..LoggerConfig::default()
    })?;

    info!(target: "standbyd", "starting task server in standby mode");
    if cfg.auth_enabled() {
        info!(target: "standbyd", "authentication enabled (Bearer token required)");
    } else {
        warn!(target: "standbyd", "authentication disabled (TASK_AUTH_TOKEN not set)");
    }
    info!(target: "standbyd", timeout_secs = cfg.timeout.as_secs(), "script timeout");

    let pipeline = ScriptPipeline::new(ExecConfig {
        work_dir: cfg.work_dir.clone(),
        interpreter: cfg.interpreter.clone(),
        timeout: cfg.timeout,
    })
    .context("failed to build execution pipeline")?;

    let api = HttpApi::new(PipelineLauncher::new(pipeline), cfg.auth_token.clone());

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(target: "standbyd", %addr, "listening; POST /task to submit, GET /health to probe");

    axum::serve(listener, api.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!(target: "standbyd", "shutdown signal received");
}
