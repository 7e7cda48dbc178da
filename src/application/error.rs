//! 应用层错误定义
//!
//! 所有操作统一返回 `HandlerError`，由 dispatcher 在边界处转换为 `{"error": ...}`

use thiserror::Error;

use crate::application::ports::{SpeechModelError, StoreError, TranscodeError};
use crate::domain::VoiceCloneError;

const STORE_UNAVAILABLE: &str = "clone storage unavailable";

/// 稳定的错误分类，供调用方和测试匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownOperation,
    MissingField,
    InvalidField,
    VoiceCloneNotFound,
    AudioConversionFailed,
    SynthesisFailed,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownOperation => "unknown_operation",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::InvalidField => "invalid_field",
            ErrorKind::VoiceCloneNotFound => "voice_clone_not_found",
            ErrorKind::AudioConversionFailed => "audio_conversion_failed",
            ErrorKind::SynthesisFailed => "synthesis_failed",
            ErrorKind::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 请求处理错误
#[derive(Debug, Error)]
pub enum HandlerError {
    /// 未知或缺失的 operation
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// 缺少必填字段
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// 字段类型或内容非法
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// 克隆不存在（含记录损坏）
    #[error("Voice clone not found: {0}")]
    VoiceCloneNotFound(String),

    /// 转码失败，携带转码工具的诊断输出
    #[error("Audio conversion failed: {0}")]
    AudioConversionFailed(String),

    /// 模型合成失败
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// 兜底错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl HandlerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            HandlerError::MissingField(_) => ErrorKind::MissingField,
            HandlerError::InvalidField { .. } => ErrorKind::InvalidField,
            HandlerError::VoiceCloneNotFound(_) => ErrorKind::VoiceCloneNotFound,
            HandlerError::AudioConversionFailed(_) => ErrorKind::AudioConversionFailed,
            HandlerError::SynthesisFailed(_) => ErrorKind::SynthesisFailed,
            HandlerError::InternalError(_) => ErrorKind::InternalError,
        }
    }

    /// 创建字段非法错误
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

/// 存储故障的细节（路径、数据库信息）只记录日志，不返回给调用方
impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Clone store failure");
        Self::InternalError(STORE_UNAVAILABLE.to_string())
    }
}

impl From<TranscodeError> for HandlerError {
    fn from(err: TranscodeError) -> Self {
        Self::AudioConversionFailed(err.to_string())
    }
}

impl From<SpeechModelError> for HandlerError {
    fn from(err: SpeechModelError) -> Self {
        Self::SynthesisFailed(err.to_string())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<VoiceCloneError> for HandlerError {
    fn from(err: VoiceCloneError) -> Self {
        match err {
            VoiceCloneError::EmptyName | VoiceCloneError::NameTooLong { .. } => {
                Self::invalid("voice_name", err.to_string())
            }
            VoiceCloneError::EmptyReferenceAudio => {
                Self::invalid("reference_audio_base64", err.to_string())
            }
        }
    }
}
