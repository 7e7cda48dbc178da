//! Test Input Runner

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::application::JobHandler;

/// 测试输入错误
#[derive(Debug, Error)]
pub enum TestInputError {
    #[error("failed to read test input {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("test input is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("test input has no \"input\" field")]
    MissingInput,
}

/// 读取信封文件并执行一次 handler，返回 handler 输出
pub async fn run_test_input(
    handler: &dyn JobHandler,
    path: &Path,
) -> Result<Value, TestInputError> {
    let raw = tokio::fs::read(path).await.map_err(|source| TestInputError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let event: Value = serde_json::from_slice(&raw)?;
    if event.get("input").is_none() {
        return Err(TestInputError::MissingInput);
    }

    tracing::info!(path = %path.display(), "Running test input");
    let output = handler.handle_event(&event).await;
    tracing::info!(success = output.is_success(), "Test input completed");

    Ok(output.to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ErrorResponse, HandlerOutput};
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::tempdir;

    struct OperationEcho;

    #[async_trait]
    impl JobHandler for OperationEcho {
        async fn handle_event(&self, event: &Value) -> HandlerOutput {
            HandlerOutput::Error(ErrorResponse {
                error: format!("echo: {}", event["input"]["operation"]),
            })
        }
    }

    #[tokio::test]
    async fn test_runs_envelope_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_input.json");
        std::fs::write(&path, r#"{"input": {"operation": "clone_voice"}}"#).unwrap();

        let output = run_test_input(&OperationEcho, &path).await.unwrap();
        assert_eq!(output, json!({"error": "echo: \"clone_voice\""}));
    }

    #[tokio::test]
    async fn test_rejects_bad_files() {
        let dir = tempdir().unwrap();

        let missing = run_test_input(&OperationEcho, &dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(TestInputError::Read { .. })));

        let path = dir.path().join("no_input.json");
        std::fs::write(&path, r#"{"operation": "clone_voice"}"#).unwrap();
        let no_input = run_test_input(&OperationEcho, &path).await;
        assert!(matches!(no_input, Err(TestInputError::MissingInput)));
    }
}
