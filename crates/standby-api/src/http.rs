use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use standby_model::{TaskRequest, validate_task};

use crate::auth::validate_auth;
use crate::coordinator::TaskCoordinator;
use crate::error::ApiError;
use crate::launcher::TaskLauncher;

/// HTTP surface of the standby worker.
pub struct HttpApi<L> {
    state: Arc<ApiState<L>>,
}

struct ApiState<L> {
    coordinator: TaskCoordinator,
    auth_token: String,
    launcher: L,
}

impl<L> HttpApi<L>
where
    L: TaskLauncher,
{
    pub fn new(launcher: L, auth_token: impl Into<String>) -> Self {
        Self {
            state: Arc::new(ApiState {
                coordinator: TaskCoordinator::new(),
                auth_token: auth_token.into(),
                launcher,
            }),
        }
    }

    /// Build the axum router.
    ///
    /// Routes:
    /// - GET /health - liveness probe, no auth
    /// - POST /task - submit a task for single-flight execution
    pub fn router(self) -> Router {
        Router::new()
            .route("/health", get(health::<L>))
            .route("/task", post(submit_task::<L>))
            .with_state(self.state)
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    mode: &'static str,
    task_executing: bool,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct TaskAccepted {
    status: &'static str,
    message: &'static str,
    script_url: String,
    script_name: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health<L>(State(state): State<Arc<ApiState<L>>>) -> Json<HealthResponse>
where
    L: TaskLauncher,
{
    Json(HealthResponse {
        status: "healthy",
        mode: "standby",
        task_executing: state.coordinator.is_executing(),
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    })
}

/// POST /task
///
/// Order matters: auth, then the atomic slot claim, then body parsing and
/// validation. The conflict check deliberately precedes parsing so a busy
/// worker answers 409 no matter what the body looks like; any failure after
/// the claim releases the slot before responding.
async fn submit_task<L>(
    State(state): State<Arc<ApiState<L>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<TaskAccepted>), ApiError>
where
    L: TaskLauncher,
{
    info!(target: "standby.api", "task received");

    if let Err(err) = validate_auth(&headers, &state.auth_token) {
        warn!(target: "standby.api", error = %err, "authentication failed");
        return Err(ApiError::Unauthorized(err.to_string()));
    }

    if !state.coordinator.try_begin() {
        warn!(target: "standby.api", "task already executing");
        return Err(ApiError::Conflict(
            "Another task is already executing".to_string(),
        ));
    }

    let task = match parse_task(&body) {
        Ok(task) => task,
        Err(err) => {
            // Claimed above but nothing is in flight; release the slot.
            state.coordinator.finish();
            warn!(target: "standby.api", error = %err, "task rejected");
            return Err(err);
        }
    };

    info!(
        target: "standby.api",
        url = %task.script_url,
        name = %task.script_name,
        "task validated; starting execution"
    );

    let accepted = TaskAccepted {
        status: "accepted",
        message: "Task accepted and execution started",
        script_url: task.script_url.clone(),
        script_name: task.script_name.clone(),
    };

    // Fire-and-forget: the handler returns 202 while the launcher runs. The
    // trailing finish() is advisory, production launchers end in a process
    // restart and never reach it.
    let state = Arc::clone(&state);
    tokio::spawn(async move {
        state.launcher.run(task).await;
        state.coordinator.finish();
    });

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

fn parse_task(body: &[u8]) -> Result<TaskRequest, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid JSON: {e}")))?;
    validate_task(&value).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}
