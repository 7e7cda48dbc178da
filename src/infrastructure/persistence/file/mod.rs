//! File Clone Store - 共享卷上的 JSON 文件存储
//!
//! 每条记录一个文件 `<dir>/<clone_id>.json`。写入先落到同目录临时文件，
//! 再以不覆盖方式原子重命名，读者不会看到写了一半的记录。

use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::application::ports::{CloneStorePort, StoreError};
use crate::domain::CloneId;

const RECORD_EXTENSION: &str = "json";

/// 文件克隆存储
#[derive(Debug, Clone)]
pub struct FileCloneStore {
    dir: PathBuf,
}

impl FileCloneStore {
    /// 创建存储，目录不存在时自动创建
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", dir.display(), e)))?;

        tracing::info!(dir = %dir.display(), "File clone store initialized");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &CloneId) -> PathBuf {
        self.dir.join(format!("{}.{}", key.as_str(), RECORD_EXTENSION))
    }
}

/// 原子写入（不覆盖已存在的文件）
fn write_new_file(dir: &Path, target: &Path, data: &[u8]) -> Result<(), StoreError> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::Io(e.to_string()))?;
    tmp.write_all(data)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| StoreError::Io(e.to_string()))?;

    tmp.persist_noclobber(target).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            StoreError::AlreadyExists(target.display().to_string())
        } else {
            StoreError::Io(format!("{}: {}", target.display(), e.error))
        }
    })?;

    Ok(())
}

#[async_trait]
impl CloneStorePort for FileCloneStore {
    async fn put(&self, key: &CloneId, record: &[u8]) -> Result<(), StoreError> {
        // 共享卷可能在启动后才挂载
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", self.dir.display(), e)))?;

        let dir = self.dir.clone();
        let target = self.record_path(key);
        let data = record.to_vec();

        tokio::task::spawn_blocking(move || write_new_file(&dir, &target, &data))
            .await
            .map_err(|e| StoreError::Io(format!("write task failed: {}", e)))??;

        tracing::debug!(clone_id = %key, dir = %self.dir.display(), "Clone record written");
        Ok(())
    }

    async fn get(&self, key: &CloneId) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.record_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.dir.display())
    }
}
