//! HTTP Routes
//!
//! Endpoints:
//! - /run       POST  执行 job
//! - /runsync   POST  执行 job（同步）
//! - /health    GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/run", post(handlers::run_job))
        .route("/runsync", post(handlers::run_job_sync))
        .route("/health", get(handlers::health))
}
