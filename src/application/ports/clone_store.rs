//! Clone Store Port - 克隆记录持久化抽象
//!
//! 后端只负责按 key 读写原始记录字节，记录格式由 `CloneStore` 服务决定。
//! 记录一经写入不可修改，因此各后端无需读改写与锁。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::CloneId;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Clone Store Port
///
/// 多个 worker 进程共享同一后端，写入对任何读取同一位置的进程可见
#[async_trait]
pub trait CloneStorePort: Send + Sync {
    /// 写入新记录（key 已存在时返回 AlreadyExists）
    async fn put(&self, key: &CloneId, record: &[u8]) -> Result<(), StoreError>;

    /// 读取记录，不存在返回 None
    async fn get(&self, key: &CloneId) -> Result<Option<Vec<u8>>, StoreError>;

    /// 列出所有已知 key（仅用于诊断日志）
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// 后端描述（日志用）
    fn describe(&self) -> String;
}
