//! Scratch Space - 请求级临时文件
//!
//! 文件名由 tempfile 随机生成，同一进程内并发请求互不冲突；
//! 返回的 `TempPath` 在 drop 时删除文件，成功与失败路径都会清理。

use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};

/// 随机文件名字节数
const RAND_BYTES: usize = 12;

/// 临时文件目录
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl ScratchSpace {
    /// 创建临时目录（None 时使用系统临时目录）
    pub fn new(dir: Option<PathBuf>) -> io::Result<Self> {
        let dir = dir.unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 创建一个空的临时文件
    pub fn file(&self, prefix: &str, suffix: &str) -> io::Result<TempPath> {
        let file = Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .rand_bytes(RAND_BYTES)
            .tempfile_in(&self.dir)?;
        Ok(file.into_temp_path())
    }

    /// 创建临时文件并写入数据
    pub async fn write(&self, prefix: &str, suffix: &str, data: &[u8]) -> io::Result<TempPath> {
        let path = self.file(prefix, suffix)?;
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}
