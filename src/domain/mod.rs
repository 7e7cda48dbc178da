//! Domain Layer - 领域层
//!
//! Voice Clone Context: 声音克隆的注册与查找

pub mod voice_clone;

pub use voice_clone::{CloneId, VoiceClone, VoiceCloneError, VoiceName};
