//! Job Handlers
//!
//! `/run` 和 `/runsync`：本地运行时两者都同步执行并直接返回结果

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::http::dto::{JobResponse, JOB_COMPLETED};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// POST /run
pub async fn run_job(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<JobResponse>, ApiError> {
    execute(&state, &body).await.map(Json)
}

/// POST /runsync
pub async fn run_job_sync(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<JobResponse>, ApiError> {
    execute(&state, &body).await.map(Json)
}

async fn execute(state: &AppState, body: &[u8]) -> Result<JobResponse, ApiError> {
    let event: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    if event.get("input").is_none() {
        return Err(ApiError::BadRequest(
            "Missing required field: input".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    tracing::info!(job_id = %id, "Job received");

    let output = state.handler.handle_event(&event).await;
    tracing::info!(job_id = %id, success = output.is_success(), "Job completed");

    Ok(JobResponse {
        id,
        status: JOB_COMPLETED,
        output: output.to_value(),
    })
}
