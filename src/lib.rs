//! Clonevox - 语音克隆 + TTS serverless worker
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - VoiceClone: 克隆 id、名称与参考音频
//!
//! 音频 (audio/):
//! - WAV 编解码、symphonia 解码、下混与重采样
//!
//! 应用层 (application/):
//! - Ports: CloneStore, AudioTranscoder, SpeechModel
//! - Services: 克隆存储、参考音频规范化、TTS 适配、scratch 文件
//! - Commands: clone_voice / generate_audio
//! - Dispatcher: 按 operation 分发，错误边界
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 本地 job 接口 (/run, /runsync, /health)
//! - Persistence: 文件 / SQLite 克隆存储
//! - Memory: 进程内克隆存储
//! - Adapters: ffmpeg / symphonia 转码器，HTTP / 占位语音模型
//! - Worker: 测试输入单次执行

pub mod application;
pub mod audio;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
