//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StoreBackend};
use crate::application::ports::SpeechModelKind;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "CLONEVOX";

/// 参考音频采样率允许范围
const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 8000..=192000;

/// 加载应用配置
///
/// # 环境变量示例
/// - `CLONEVOX_SERVER__PORT=8080`
/// - `CLONEVOX_STORE__DIR=/runpod-volume/clones`
/// - `CLONEVOX_AUDIO__TRANSCODER=symphonia`
/// - `CLONEVOX_MODEL__URL=http://tts-server:8001`
/// - `CLONEVOX_WORKER__TEST_INPUT=test_input.json`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索默认配置文件
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("store.backend", "file")?
        .set_default("store.dir", "/runpod-volume/voice_clones")?
        .set_default("store.sqlite_path", "/runpod-volume/voice_clones.db")?
        .set_default("store.max_connections", 5)?
        .set_default("audio.sample_rate", 24000)?
        .set_default("audio.channels", 1)?
        .set_default("audio.transcoder", "ffmpeg")?
        .set_default("audio.ffmpeg_path", "ffmpeg")?
        .set_default("model.backend", "http")?
        .set_default("model.url", "http://127.0.0.1:8001")?
        .set_default("model.timeout_secs", 120)?
        .set_default("model.max_retries", 0)?
        .set_default("model.duration_decimals", 2)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 层级分隔符: __ (双下划线)，变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if !SAMPLE_RATE_RANGE.contains(&config.audio.sample_rate) {
        return Err(ConfigError::ValidationError(format!(
            "Audio sample rate {} is outside {}..={}",
            config.audio.sample_rate,
            SAMPLE_RATE_RANGE.start(),
            SAMPLE_RATE_RANGE.end()
        )));
    }

    if config.audio.channels == 0 {
        return Err(ConfigError::ValidationError(
            "Audio channels cannot be 0".to_string(),
        ));
    }

    if config.store.backend == StoreBackend::File && config.store.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Store directory cannot be empty".to_string(),
        ));
    }

    if config.store.backend == StoreBackend::Sqlite
        && config.store.sqlite_path.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "SQLite path cannot be empty".to_string(),
        ));
    }

    if config.model.backend == SpeechModelKind::Http && config.model.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Model URL cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    match config.store.backend {
        StoreBackend::File => tracing::info!("Store: file ({})", config.store.dir.display()),
        StoreBackend::Sqlite => tracing::info!(
            "Store: sqlite ({}, max {} connections)",
            config.store.sqlite_path.display(),
            config.store.max_connections
        ),
        StoreBackend::Memory => tracing::info!("Store: memory (not shared between workers)"),
    }
    tracing::info!("Reference Format: {}", config.audio.format());
    tracing::info!("Transcoder: {}", config.audio.transcoder);
    match &config.audio.scratch_dir {
        Some(dir) => tracing::info!("Scratch Directory: {}", dir.display()),
        None => tracing::info!("Scratch Directory: {}", std::env::temp_dir().display()),
    }
    tracing::info!("Model: {}", config.model.backend);
    if config.model.backend == SpeechModelKind::Http {
        tracing::info!("Model URL: {}", config.model.url);
        tracing::info!("Model Timeout: {}s", config.model.timeout_secs);
    }
    if let Some(path) = &config.worker.test_input {
        tracing::info!("Test Input: {}", path.display());
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TranscoderKind;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_validation_passes_for_default_config() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_sample_rate() {
        let mut config = AppConfig::default();
        config.audio.sample_rate = 4000;
        assert!(validate_config(&config).is_err());
        config.audio.sample_rate = 192000;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_channels() {
        let mut config = AppConfig::default();
        config.audio.channels = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_store_dir_only_matters_for_file_backend() {
        let mut config = AppConfig::default();
        config.store.dir = PathBuf::new();
        assert!(validate_config(&config).is_err());

        config.store.backend = StoreBackend::Memory;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_url_only_matters_for_http_model() {
        let mut config = AppConfig::default();
        config.model.url = String::new();
        assert!(validate_config(&config).is_err());

        config.model.backend = SpeechModelKind::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[store]
backend = "sqlite"
sqlite_path = "/tmp/clones.db"

[audio]
sample_rate = 16000
transcoder = "symphonia"

[model]
backend = "fake"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.sqlite_path, PathBuf::from("/tmp/clones.db"));
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.audio.transcoder, TranscoderKind::Symphonia);
        assert_eq!(config.model.backend, SpeechModelKind::Fake);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.duration_decimals, 2);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[audio]\nchannels = 0").unwrap();

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
