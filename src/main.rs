//! Clonevox - 语音克隆 + TTS serverless worker
//!
//! 启动流程: 配置 → 日志 → 存储 / 转码器 / 模型 → dispatcher → test input 或 job 服务器

use std::sync::Arc;

use clonevox::application::{
    AudioNormalizer, AudioTranscoderPort, CloneStore, CloneStorePort, CloneVoiceHandler,
    GenerateAudioHandler, JobHandler, OperationDispatcher, ScratchSpace, SpeechModelKind,
    SpeechModelPort, TranscoderKind, TtsAdapter,
};
use clonevox::config::{load_config, print_config, AppConfig, StoreBackend};
use clonevox::infrastructure::adapters::{
    FakeSpeechModel, FfmpegTranscoder, FfmpegTranscoderConfig, HttpSpeechModel,
    HttpSpeechModelConfig, SymphoniaTranscoder,
};
use clonevox::infrastructure::http::{start, ServerConfig};
use clonevox::infrastructure::memory::InMemoryCloneStore;
use clonevox::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
use clonevox::infrastructure::persistence::{FileCloneStore, SqliteCloneStore};
use clonevox::infrastructure::worker::run_test_input;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Clonevox {} starting", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let store = CloneStore::new(build_store(&config).await?);
    let transcoder = build_transcoder(&config);
    let model = build_model(&config)?;

    if config.model.backend == SpeechModelKind::Http && !model.health_check().await {
        tracing::warn!(url = %config.model.url, "Model service is not reachable yet");
    }

    let scratch = ScratchSpace::new(config.audio.scratch_dir.clone())?;
    let normalizer = Arc::new(AudioNormalizer::for_model(
        transcoder,
        scratch.clone(),
        model.as_ref(),
        config.audio.channels,
    ));
    let tts = Arc::new(TtsAdapter::new(
        model,
        scratch,
        config.model.duration_decimals,
    ));

    let dispatcher = OperationDispatcher::new(
        CloneVoiceHandler::new(store.clone()),
        GenerateAudioHandler::new(store.clone(), normalizer, tts),
    );
    let handler: Arc<dyn JobHandler> = Arc::new(dispatcher);

    tracing::info!(store = %store.describe(), "Handler ready");

    if let Some(path) = &config.worker.test_input {
        let output = run_test_input(handler.as_ref(), path).await?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    start(handler, server_config, shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},clonevox={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CloneStorePort>> {
    let store: Arc<dyn CloneStorePort> = match config.store.backend {
        StoreBackend::File => Arc::new(FileCloneStore::new(&config.store.dir).await?),
        StoreBackend::Sqlite => {
            if let Some(parent) = config.store.sqlite_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let db_config = DatabaseConfig::new(&config.store.sqlite_path)
                .with_max_connections(config.store.max_connections);
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;
            Arc::new(SqliteCloneStore::new(
                pool,
                config.store.sqlite_path.display().to_string(),
            ))
        }
        StoreBackend::Memory => {
            tracing::warn!("In-memory store: clones are not visible to other workers");
            Arc::new(InMemoryCloneStore::new())
        }
    };
    Ok(store)
}

fn build_transcoder(config: &AppConfig) -> Arc<dyn AudioTranscoderPort> {
    match config.audio.transcoder {
        TranscoderKind::Ffmpeg => Arc::new(FfmpegTranscoder::new(FfmpegTranscoderConfig {
            ffmpeg_path: config.audio.ffmpeg_path.clone(),
        })),
        TranscoderKind::Symphonia => Arc::new(SymphoniaTranscoder::new()),
    }
}

fn build_model(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechModelPort>> {
    let model: Arc<dyn SpeechModelPort> = match config.model.backend {
        SpeechModelKind::Http => {
            let model_config = HttpSpeechModelConfig {
                base_url: config.model.url.clone(),
                timeout_secs: config.model.timeout_secs,
                max_retries: config.model.max_retries,
                sample_rate: config.audio.sample_rate,
            };
            Arc::new(HttpSpeechModel::new(model_config)?)
        }
        SpeechModelKind::Fake => Arc::new(FakeSpeechModel::new(config.audio.sample_rate)),
    };
    Ok(model)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
