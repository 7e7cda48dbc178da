//! Audio Normalizer - 参考音频规范化
//!
//! 将任意编码的上传音频转为模型要求的规范格式（单声道、16-bit PCM、固定采样率）。
//! 具体解码/重采样委托给 `AudioTranscoderPort`，本服务负责：
//! 1. 输入写入 scratch 文件
//! 2. 以显式的目标参数调用转码
//! 3. 校验输出确为规范格式
//! 4. 所有 scratch 文件在任意退出路径上删除

use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;

use crate::application::error::HandlerError;
use crate::application::ports::{AudioTranscoderPort, SpeechModelPort};
use crate::application::services::ScratchSpace;
use crate::audio::{parse_wav_header, PcmFormat};

/// 规范化后的参考音频
///
/// 持有 scratch 文件，drop 时删除
#[derive(Debug)]
pub struct NormalizedAudio {
    path: TempPath,
    format: PcmFormat,
    frame_count: usize,
}

impl NormalizedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.format.sample_rate as f64
    }
}

/// 音频规范化服务
pub struct AudioNormalizer {
    transcoder: Arc<dyn AudioTranscoderPort>,
    scratch: ScratchSpace,
    format: PcmFormat,
}

impl AudioNormalizer {
    pub fn new(
        transcoder: Arc<dyn AudioTranscoderPort>,
        scratch: ScratchSpace,
        format: PcmFormat,
    ) -> Self {
        Self {
            transcoder,
            scratch,
            format,
        }
    }

    /// 目标采样率取自模型要求的参考音频采样率
    pub fn for_model(
        transcoder: Arc<dyn AudioTranscoderPort>,
        scratch: ScratchSpace,
        model: &dyn SpeechModelPort,
        channels: u16,
    ) -> Self {
        Self::new(transcoder, scratch, PcmFormat::new(model.sample_rate(), channels))
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// 规范化并保留在 scratch 文件中（供模型读取）
    pub async fn normalize_to_scratch(&self, input: &[u8]) -> Result<NormalizedAudio, HandlerError> {
        if input.is_empty() {
            return Err(HandlerError::AudioConversionFailed(
                "input audio is empty".to_string(),
            ));
        }

        let input_file = self.scratch.write("ref_in_", ".bin", input).await?;
        let output_file = self.scratch.file("ref_canon_", ".wav")?;

        self.transcoder
            .transcode(&input_file, &output_file, &self.format)
            .await?;

        let output = tokio::fs::read(&output_file).await?;
        let header = parse_wav_header(&output).map_err(|e| {
            HandlerError::AudioConversionFailed(format!("transcoder produced invalid output: {}", e))
        })?;

        if !header.matches(&self.format) {
            return Err(HandlerError::AudioConversionFailed(format!(
                "transcoder produced {}Hz {}ch {}-bit (format {}), expected {}",
                header.sample_rate,
                header.num_channels,
                header.bits_per_sample,
                header.audio_format,
                self.format
            )));
        }

        tracing::debug!(
            transcoder = %self.transcoder.kind(),
            input_size = input.len(),
            output_size = output.len(),
            frames = header.frame_count(),
            "Reference audio normalized"
        );

        Ok(NormalizedAudio {
            path: output_file,
            format: self.format,
            frame_count: header.frame_count(),
        })
    }

    /// 规范化并返回 WAV 字节
    pub async fn normalize(&self, input: &[u8]) -> Result<Vec<u8>, HandlerError> {
        let normalized = self.normalize_to_scratch(input).await?;
        Ok(tokio::fs::read(normalized.path()).await?)
    }
}
