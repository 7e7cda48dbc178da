//! Speech Model Port - TTS 模型能力抽象
//!
//! 模型本身是外部黑盒：输入文本和规范化的参考音频路径，输出单声道波形

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// 模型错误
#[derive(Debug, Error)]
pub enum SpeechModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Reference audio unreadable: {0}")]
    ReferenceAudio(String),
}

/// 合成结果波形（单声道，[-1.0, 1.0]）
#[derive(Debug, Clone)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// 模型后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechModelKind {
    /// 外部推理服务
    #[default]
    Http,
    /// 占位模型（本地运行 / 测试）
    Fake,
}

impl std::fmt::Display for SpeechModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechModelKind::Http => write!(f, "http"),
            SpeechModelKind::Fake => write!(f, "fake"),
        }
    }
}

/// Speech Model Port
#[async_trait]
pub trait SpeechModelPort: Send + Sync {
    /// 以参考音频为条件合成文本
    async fn generate(&self, text: &str, reference_audio: &Path)
        -> Result<Waveform, SpeechModelError>;

    /// 模型要求的参考音频采样率
    fn sample_rate(&self) -> u32;

    /// 检查模型是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
