//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::ports::{SpeechModelKind, TranscoderKind};
use crate::audio::PcmFormat;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// job 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 克隆存储配置
    #[serde(default)]
    pub store: StoreConfig,

    /// 音频规范化配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 语音模型配置
    #[serde(default)]
    pub model: ModelConfig,

    /// worker 配置
    #[serde(default)]
    pub worker: WorkerConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// 共享卷上的 JSON 文件
    #[default]
    File,
    /// SQLite 数据库文件
    Sqlite,
    /// 进程内（不跨 worker 共享）
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// 克隆存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// file 后端的记录目录
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,

    /// sqlite 后端的数据库文件
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    /// sqlite 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("/runpod-volume/voice_clones")
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("/runpod-volume/voice_clones.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            dir: default_store_dir(),
            sqlite_path: default_sqlite_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 音频规范化配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 参考音频目标采样率
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 参考音频目标声道数
    #[serde(default = "default_channels")]
    pub channels: u16,

    #[serde(default)]
    pub transcoder: TranscoderKind,

    /// ffmpeg 可执行文件
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// scratch 目录（默认系统临时目录）
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_channels() -> u16 {
    1
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            transcoder: TranscoderKind::default(),
            ffmpeg_path: default_ffmpeg_path(),
            scratch_dir: None,
        }
    }
}

impl AudioConfig {
    /// 规范化目标格式
    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels)
    }
}

/// 语音模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub backend: SpeechModelKind,

    /// 推理服务基础 URL
    #[serde(default = "default_model_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,

    /// 最大重试次数
    #[serde(default)]
    pub max_retries: u32,

    /// 返回时长保留的小数位
    #[serde(default = "default_duration_decimals")]
    pub duration_decimals: u32,
}

fn default_model_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_model_timeout() -> u64 {
    120
}

fn default_duration_decimals() -> u32 {
    2
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: SpeechModelKind::default(),
            url: default_model_url(),
            timeout_secs: default_model_timeout(),
            max_retries: 0,
            duration_decimals: default_duration_decimals(),
        }
    }
}

/// worker 配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerConfig {
    /// 设置时执行一次该文件中的 job 后退出
    #[serde(default)]
    pub test_input: Option<PathBuf>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别（RUST_LOG 优先）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 输出 JSON 格式日志
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
