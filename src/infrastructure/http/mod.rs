//! HTTP Layer - 本地 job 调用接口
//!
//! 模拟 serverless 平台的 worker API：平台把 `{"input": ...}` 投递给 handler，
//! 结果包在 `{"id", "status", "output"}` 中返回

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{start, HttpServer, ServerConfig};
pub use state::AppState;
