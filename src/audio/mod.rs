//! Audio - PCM/WAV 编解码工具
//!
//! 提供与具体转码后端无关的基础能力：
//! - WAV 头解析与 16-bit PCM WAV 编码
//! - 基于 symphonia 的任意容器解码
//! - 声道下混与线性重采样

pub mod decode;
pub mod resample;
pub mod wav;

use thiserror::Error;

pub use decode::{decode_audio, DecodedAudio};
pub use resample::{downmix_to_mono, resample_linear};
pub use wav::{encode_wav_i16, f32_to_i16, parse_wav_header, rewrap_pcm16, WavHeader};

/// 编解码错误
#[derive(Debug, Error)]
pub enum AudioCodecError {
    #[error("Invalid WAV: {0}")]
    InvalidWav(String),

    #[error("Decoding error: {0}")]
    Decoding(String),
}

/// 目标 PCM 格式（位深固定为 16-bit）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// 采样率（Hz）
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
}

impl PcmFormat {
    pub const BITS_PER_SAMPLE: u16 = 16;

    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// 单声道
    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1)
    }
}

impl std::fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pcm_s16le {}Hz {}ch",
            self.sample_rate, self.channels
        )
    }
}
