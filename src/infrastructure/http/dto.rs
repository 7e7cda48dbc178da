//! Data Transfer Objects

use serde::Serialize;
use serde_json::Value;

/// job 完成状态
pub const JOB_COMPLETED: &str = "COMPLETED";

/// job 响应
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: String,
    pub status: &'static str,
    pub output: Value,
}
