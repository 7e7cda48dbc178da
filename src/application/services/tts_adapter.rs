//! TTS Adapter - 模型调用与结果编码
//!
//! 约束:
//! - 参考音频必须已规范化（只接受 `NormalizedAudio`）
//! - 时长 = 样本数 / 采样率，按配置的小数位四舍五入
//! - 生成的波形先落盘为 scratch WAV，再编码为 base64，之后删除该文件

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::sync::Arc;

use crate::application::error::HandlerError;
use crate::application::ports::SpeechModelPort;
use crate::application::services::{NormalizedAudio, ScratchSpace};
use crate::audio::{encode_wav_i16, f32_to_i16, PcmFormat};

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// base64 编码的 WAV
    pub audio_base64: String,
    /// 时长（秒，已四舍五入）
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub sample_count: usize,
}

/// TTS 适配器
pub struct TtsAdapter {
    model: Arc<dyn SpeechModelPort>,
    scratch: ScratchSpace,
    duration_decimals: u32,
}

impl TtsAdapter {
    pub fn new(model: Arc<dyn SpeechModelPort>, scratch: ScratchSpace, duration_decimals: u32) -> Self {
        Self {
            model,
            scratch,
            duration_decimals,
        }
    }

    /// 合成文本并编码为可传输的结果
    pub async fn synthesize(
        &self,
        text: &str,
        reference: &NormalizedAudio,
    ) -> Result<SynthesizedAudio, HandlerError> {
        let waveform = self.model.generate(text, reference.path()).await?;

        if waveform.sample_rate == 0 {
            return Err(HandlerError::SynthesisFailed(
                "model reported a zero sample rate".to_string(),
            ));
        }
        if waveform.samples.is_empty() {
            return Err(HandlerError::SynthesisFailed(
                "model returned an empty waveform".to_string(),
            ));
        }

        let sample_count = waveform.samples.len();
        let duration_secs = round_to(
            sample_count as f64 / waveform.sample_rate as f64,
            self.duration_decimals,
        );

        let pcm: Vec<i16> = waveform.samples.iter().map(|&s| f32_to_i16(s)).collect();
        let wav = encode_wav_i16(&pcm, &PcmFormat::mono(waveform.sample_rate));

        // 落盘后再读取编码，scratch 文件在作用域结束时删除
        let scratch_file = self.scratch.write("gen_", ".wav", &wav).await?;
        let encoded = tokio::fs::read(&scratch_file).await?;
        let audio_base64 = BASE64_STANDARD.encode(&encoded);
        drop(scratch_file);

        tracing::debug!(
            sample_count = sample_count,
            sample_rate = waveform.sample_rate,
            duration_secs = duration_secs,
            encoded_size = audio_base64.len(),
            "Waveform encoded"
        );

        Ok(SynthesizedAudio {
            audio_base64,
            duration_secs,
            sample_rate: waveform.sample_rate,
            sample_count,
        })
    }
}

/// 四舍五入到指定小数位
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{SpeechModelError, Waveform};
    use crate::application::services::AudioNormalizer;
    use crate::application::ErrorKind;
    use crate::audio::parse_wav_header;
    use crate::infrastructure::adapters::SymphoniaTranscoder;
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::tempdir;

    /// 返回固定样本数的模型
    struct FixedModel {
        samples: usize,
        sample_rate: u32,
    }

    #[async_trait]
    impl SpeechModelPort for FixedModel {
        async fn generate(&self, _text: &str, reference: &Path) -> Result<Waveform, SpeechModelError> {
            assert!(reference.exists());
            Ok(Waveform {
                samples: vec![0.1; self.samples],
                sample_rate: self.sample_rate,
            })
        }

        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }
    }

    async fn reference(scratch: &ScratchSpace) -> NormalizedAudio {
        let normalizer = AudioNormalizer::new(
            Arc::new(SymphoniaTranscoder::new()),
            scratch.clone(),
            PcmFormat::mono(24000),
        );
        let wav = encode_wav_i16(&vec![0i16; 2400], &PcmFormat::mono(24000));
        normalizer.normalize_to_scratch(&wav).await.unwrap()
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[tokio::test]
    async fn test_duration_and_encoding() {
        let dir = tempdir().unwrap();
        let scratch = ScratchSpace::new(Some(dir.path().to_path_buf())).unwrap();
        let adapter = TtsAdapter::new(
            Arc::new(FixedModel {
                samples: 37_000,
                sample_rate: 24000,
            }),
            scratch.clone(),
            2,
        );

        let reference = reference(&scratch).await;
        let result = adapter.synthesize("Hello world", &reference).await.unwrap();

        // 37000 / 24000 = 1.541666...
        assert_eq!(result.duration_secs, 1.54);
        assert_eq!(result.sample_count, 37_000);

        let wav = BASE64_STANDARD.decode(&result.audio_base64).unwrap();
        let header = parse_wav_header(&wav).unwrap();
        assert_eq!(header.sample_rate, 24000);
        assert_eq!(header.frame_count(), 37_000);

        // 只剩参考音频的 scratch 文件
        drop(reference);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_empty_waveform_is_synthesis_failure() {
        let dir = tempdir().unwrap();
        let scratch = ScratchSpace::new(Some(dir.path().to_path_buf())).unwrap();
        let adapter = TtsAdapter::new(
            Arc::new(FixedModel {
                samples: 0,
                sample_rate: 24000,
            }),
            scratch.clone(),
            2,
        );

        let reference = reference(&scratch).await;
        let err = adapter.synthesize("Hello", &reference).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SynthesisFailed);
    }
}
