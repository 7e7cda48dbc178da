//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_transcoder;
mod clone_store;
mod speech_model;

pub use audio_transcoder::{AudioTranscoderPort, TranscodeError, TranscoderKind};
pub use clone_store::{CloneStorePort, StoreError};
pub use speech_model::{SpeechModelError, SpeechModelKind, SpeechModelPort, Waveform};
