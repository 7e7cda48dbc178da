//! TTS Adapter - 语音模型实现

mod fake_speech_model;
mod http_speech_model;

pub use fake_speech_model::FakeSpeechModel;
pub use http_speech_model::{HttpSpeechModel, HttpSpeechModelConfig};
