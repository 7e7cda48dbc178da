//! HTTP Speech Model - 调用外部 TTS 推理服务
//!
//! 外部 TTS API:
//! POST {base_url}/api/tts/infer
//! Request: {"text": "...", "voice_ref": "/path/to/reference.wav"}  (JSON)
//! Response: audio/wav binary

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::application::ports::{SpeechModelError, SpeechModelPort, Waveform};
use crate::audio::{decode_audio, downmix_to_mono};

/// 推理请求体 (JSON)
#[derive(Debug, Serialize)]
struct InferHttpRequest<'a> {
    text: &'a str,
    /// 规范化后的参考音频路径（服务与 worker 共享文件系统）
    voice_ref: String,
}

/// HTTP 模型配置
#[derive(Debug, Clone)]
pub struct HttpSpeechModelConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 网络错误和超时的重试次数
    pub max_retries: u32,
    /// 模型要求的参考音频采样率
    pub sample_rate: u32,
}

impl Default for HttpSpeechModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            timeout_secs: 120,
            max_retries: 0,
            sample_rate: 24000,
        }
    }
}

/// HTTP 语音模型
pub struct HttpSpeechModel {
    client: Client,
    config: HttpSpeechModelConfig,
}

impl HttpSpeechModel {
    pub fn new(config: HttpSpeechModelConfig) -> Result<Self, SpeechModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechModelError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn infer_url(&self) -> String {
        format!("{}/api/tts/infer", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }

    async fn infer_once(&self, request: &InferHttpRequest<'_>) -> Result<Vec<u8>, SpeechModelError> {
        let response = self
            .client
            .post(self.infer_url())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechModelError::Timeout
                } else if e.is_connect() {
                    SpeechModelError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    SpeechModelError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechModelError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechModelError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        Ok(audio.to_vec())
    }
}

/// 将服务返回的音频解码为单声道波形
fn decode_waveform(audio: &[u8]) -> Result<Waveform, SpeechModelError> {
    let decoded =
        decode_audio(audio).map_err(|e| SpeechModelError::InvalidResponse(e.to_string()))?;
    let samples = if decoded.channels > 1 {
        downmix_to_mono(&decoded.samples, decoded.channels)
    } else {
        decoded.samples
    };
    Ok(Waveform {
        samples,
        sample_rate: decoded.sample_rate,
    })
}

#[async_trait]
impl SpeechModelPort for HttpSpeechModel {
    async fn generate(
        &self,
        text: &str,
        reference_audio: &Path,
    ) -> Result<Waveform, SpeechModelError> {
        if !tokio::fs::try_exists(reference_audio).await.unwrap_or(false) {
            return Err(SpeechModelError::ReferenceAudio(
                reference_audio.display().to_string(),
            ));
        }

        let request = InferHttpRequest {
            text,
            voice_ref: reference_audio.to_string_lossy().into_owned(),
        };

        tracing::debug!(
            url = %self.infer_url(),
            text_len = text.len(),
            voice_ref = %request.voice_ref,
            "Sending TTS infer request"
        );

        let mut attempt = 0;
        let audio = loop {
            match self.infer_once(&request).await {
                Ok(audio) => break audio,
                Err(e @ (SpeechModelError::Timeout | SpeechModelError::NetworkError(_)))
                    if attempt < self.config.max_retries =>
                {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt = attempt, "TTS request failed, retrying");
                }
                Err(e) => return Err(e),
            }
        };

        let waveform = tokio::task::spawn_blocking(move || decode_waveform(&audio))
            .await
            .map_err(|e| SpeechModelError::InvalidResponse(format!("decode task failed: {}", e)))??;

        tracing::info!(
            samples = waveform.samples.len(),
            sample_rate = waveform.sample_rate,
            "TTS inference completed"
        );

        Ok(waveform)
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
