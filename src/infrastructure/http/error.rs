//! HTTP Error Handling
//!
//! 只用于 job 信封本身不合法的情况；业务错误由 handler 放在 `output.error` 中返回

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;

/// 错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad job request");
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
