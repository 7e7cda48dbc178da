//! Audio Transcoder Port - 音频转码抽象
//!
//! 外部转码能力：读取输入文件，输出目标格式的 16-bit PCM WAV 文件

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::audio::PcmFormat;

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// 转码工具执行失败，diagnostics 为工具的错误输出
    #[error("transcoder exited with {status}: {diagnostics}")]
    ToolFailed { status: String, diagnostics: String },

    #[error("failed to run transcoder: {0}")]
    Spawn(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("unsupported conversion: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// 转码后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscoderKind {
    /// ffmpeg 子进程
    #[default]
    Ffmpeg,
    /// 进程内 symphonia 解码 + 重采样
    Symphonia,
}

impl std::fmt::Display for TranscoderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscoderKind::Ffmpeg => write!(f, "ffmpeg"),
            TranscoderKind::Symphonia => write!(f, "symphonia"),
        }
    }
}

/// Audio Transcoder Port
#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 将 `input` 转码为 `target` 格式写入 `output`
    ///
    /// `output` 已存在时会被覆盖
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        target: &PcmFormat,
    ) -> Result<(), TranscodeError>;

    fn kind(&self) -> TranscoderKind;
}
