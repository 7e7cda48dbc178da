//! Fake Speech Model - 本地运行和测试用的占位模型
//!
//! 不加载真实模型：生成 `max(1, 字符数 / 10)` 秒的低幅正弦波

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{SpeechModelError, SpeechModelPort, Waveform};

const TONE_HZ: f32 = 220.0;
const AMPLITUDE: f32 = 0.1;

/// 占位模型
pub struct FakeSpeechModel {
    sample_rate: u32,
    calls: AtomicUsize,
}

impl FakeSpeechModel {
    pub fn new(sample_rate: u32) -> Self {
        tracing::info!(sample_rate = sample_rate, "FakeSpeechModel initialized");
        Self {
            sample_rate,
            calls: AtomicUsize::new(0),
        }
    }

    /// generate 被调用的次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 秒数不取整：11 个字符为 1.1 秒
    fn duration_secs(text: &str) -> f64 {
        (text.chars().count() as f64 / 10.0).max(1.0)
    }
}

#[async_trait]
impl SpeechModelPort for FakeSpeechModel {
    async fn generate(
        &self,
        text: &str,
        reference_audio: &Path,
    ) -> Result<Waveform, SpeechModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let metadata = tokio::fs::metadata(reference_audio)
            .await
            .map_err(|e| SpeechModelError::ReferenceAudio(format!("{}: {}", reference_audio.display(), e)))?;

        tracing::debug!(
            text_len = text.len(),
            reference_size = metadata.len(),
            "FakeSpeechModel: generating tone"
        );

        let total = (Self::duration_secs(text) * self.sample_rate as f64).round() as usize;
        let step = 2.0 * std::f32::consts::PI * TONE_HZ / self.sample_rate as f32;
        let samples = (0..total)
            .map(|i| AMPLITUDE * (step * i as f32).sin())
            .collect();

        Ok(Waveform {
            samples,
            sample_rate: self.sample_rate,
        })
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
