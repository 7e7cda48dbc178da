//! Symphonia Transcoder - 进程内转码
//!
//! 解码（symphonia，自动识别容器）→ 下混 → 线性重采样 → 16-bit PCM WAV。
//! 已是目标格式的 WAV 直接以标准头重新封装，保证重复规范化结果一致。

use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::{AudioTranscoderPort, TranscodeError, TranscoderKind};
use crate::audio::{
    decode_audio, downmix_to_mono, encode_wav_i16, f32_to_i16, parse_wav_header, resample_linear,
    rewrap_pcm16, AudioCodecError, PcmFormat,
};

/// Symphonia 转码器
#[derive(Debug, Default, Clone)]
pub struct SymphoniaTranscoder;

impl SymphoniaTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// 同步转码（在 blocking 线程中执行）
    pub fn convert(input: &[u8], target: &PcmFormat) -> Result<Vec<u8>, TranscodeError> {
        if let Ok(header) = parse_wav_header(input) {
            if header.matches(target) {
                return Ok(rewrap_pcm16(header.data(input), target));
            }
        }

        let decoded = decode_audio(input).map_err(|e| match e {
            AudioCodecError::InvalidWav(msg) | AudioCodecError::Decoding(msg) => {
                TranscodeError::Decoding(msg)
            }
        })?;

        if decoded.samples.is_empty() {
            return Err(TranscodeError::Decoding(
                "no audio samples decoded".to_string(),
            ));
        }

        let samples = match (decoded.channels, target.channels) {
            (from, to) if from == to => decoded.samples,
            (_, 1) => downmix_to_mono(&decoded.samples, decoded.channels),
            (from, to) => {
                return Err(TranscodeError::Unsupported(format!(
                    "{} -> {} channels",
                    from, to
                )))
            }
        };

        let resampled = resample_linear(
            &samples,
            decoded.sample_rate,
            target.sample_rate,
            target.channels,
        );

        let pcm: Vec<i16> = resampled.iter().map(|&s| f32_to_i16(s)).collect();
        Ok(encode_wav_i16(&pcm, target))
    }
}

#[async_trait]
impl AudioTranscoderPort for SymphoniaTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        target: &PcmFormat,
    ) -> Result<(), TranscodeError> {
        let data = tokio::fs::read(input)
            .await
            .map_err(|e| TranscodeError::Io(e.to_string()))?;

        let target = *target;
        let wav = tokio::task::spawn_blocking(move || Self::convert(&data, &target))
            .await
            .map_err(|e| TranscodeError::Io(format!("transcode task failed: {}", e)))??;

        tokio::fs::write(output, &wav)
            .await
            .map_err(|e| TranscodeError::Io(e.to_string()))?;

        Ok(())
    }

    fn kind(&self) -> TranscoderKind {
        TranscoderKind::Symphonia
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decode_audio;
    use tempfile::tempdir;

    #[test]
    fn test_canonical_input_passes_through() {
        let format = PcmFormat::mono(24000);
        let wav = encode_wav_i16(&[1, -2, 3, -4, 5], &format);
        assert_eq!(SymphoniaTranscoder::convert(&wav, &format).unwrap(), wav);
    }

    #[test]
    fn test_downmix_and_resample() {
        let source = PcmFormat::new(48000, 2);
        let interleaved: Vec<i16> = (0..48000).flat_map(|_| [8192i16, 8192]).collect();
        let wav = encode_wav_i16(&interleaved, &source);

        let out = SymphoniaTranscoder::convert(&wav, &PcmFormat::mono(24000)).unwrap();
        let header = parse_wav_header(&out).unwrap();
        assert!(header.matches(&PcmFormat::mono(24000)));
        assert_eq!(header.frame_count(), 24000);

        let decoded = decode_audio(&out).unwrap();
        assert!(decoded.samples.iter().all(|s| (s - 0.25).abs() < 1e-3));
    }

    #[test]
    fn test_mono_to_stereo_unsupported() {
        let wav = encode_wav_i16(&[0; 100], &PcmFormat::mono(16000));
        let err = SymphoniaTranscoder::convert(&wav, &PcmFormat::new(24000, 2)).unwrap_err();
        assert!(matches!(err, TranscodeError::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_transcode_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.bin");
        let output = dir.path().join("out.wav");
        tokio::fs::write(&input, encode_wav_i16(&[0; 4410], &PcmFormat::mono(44100)))
            .await
            .unwrap();

        SymphoniaTranscoder::new()
            .transcode(&input, &output, &PcmFormat::mono(24000))
            .await
            .unwrap();

        let header = parse_wav_header(&tokio::fs::read(&output).await.unwrap()).unwrap();
        assert_eq!(header.frame_count(), 2400);
    }
}
