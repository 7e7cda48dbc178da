//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 出站端口定义（CloneStore、AudioTranscoder、SpeechModel）
//! - services: 存储、规范化、TTS 适配、scratch 文件
//! - commands: clone_voice / generate_audio 命令及处理器
//! - dispatcher: 操作分发与错误边界
//! - envelope: 统一响应结构
//! - error: 应用层错误定义

pub mod commands;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod ports;
pub mod services;

// Re-exports
pub use commands::{
    handlers::{CloneVoiceHandler, GenerateAudioHandler},
    CloneVoice, GenerateAudio,
};

pub use dispatcher::{JobHandler, Operation, OperationDispatcher};

pub use envelope::{
    CloneVoiceResponse, ErrorResponse, GenerateAudioResponse, HandlerOutput, Status,
};

pub use error::{ErrorKind, HandlerError};

pub use ports::{
    AudioTranscoderPort, CloneStorePort, SpeechModelError, SpeechModelKind, SpeechModelPort,
    StoreError, TranscodeError, TranscoderKind, Waveform,
};

pub use services::{
    AudioNormalizer, CloneRecord, CloneStore, NormalizedAudio, ScratchSpace, SynthesizedAudio,
    TtsAdapter,
};
