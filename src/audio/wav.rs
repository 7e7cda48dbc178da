//! WAV 解析与编码

use super::{AudioCodecError, PcmFormat};

/// WAVE_FORMAT_PCM
const FORMAT_PCM: u16 = 1;

/// WAV 文件头信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// data chunk 在文件中的起始偏移
    pub data_start: usize,
    /// data chunk 大小（已截断到实际可用字节）
    pub data_size: usize,
}

impl WavHeader {
    /// 是否已经是目标格式的 16-bit 线性 PCM
    pub fn matches(&self, format: &PcmFormat) -> bool {
        self.audio_format == FORMAT_PCM
            && self.bits_per_sample == PcmFormat::BITS_PER_SAMPLE
            && self.num_channels == format.channels
            && self.sample_rate == format.sample_rate
    }

    /// 每声道样本数
    pub fn frame_count(&self) -> usize {
        let bytes_per_frame =
            (self.bits_per_sample as usize / 8) * self.num_channels as usize;
        if bytes_per_frame == 0 {
            return 0;
        }
        self.data_size / bytes_per_frame
    }

    pub fn data<'a>(&self, wav: &'a [u8]) -> &'a [u8] {
        &wav[self.data_start..self.data_start + self.data_size]
    }
}

/// 解析 WAV 文件头
///
/// 跳过 fmt/data 之外的 chunk（LIST、fact 等）
pub fn parse_wav_header(data: &[u8]) -> Result<WavHeader, AudioCodecError> {
    if data.len() < 44 {
        return Err(AudioCodecError::InvalidWav("data too short".to_string()));
    }

    if &data[0..4] != b"RIFF" {
        return Err(AudioCodecError::InvalidWav(
            "missing RIFF header".to_string(),
        ));
    }

    if &data[8..12] != b"WAVE" {
        return Err(AudioCodecError::InvalidWav(
            "missing WAVE identifier".to_string(),
        ));
    }

    let mut pos = 12;
    let mut fmt: Option<(u16, u16, u32, u16)> = None;
    let mut data_chunk: Option<(usize, usize)> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size =
            u32::from_le_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]])
                as usize;

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 || pos + 8 + 16 > data.len() {
                    return Err(AudioCodecError::InvalidWav(
                        "invalid fmt chunk size".to_string(),
                    ));
                }
                let f = &data[pos + 8..pos + 8 + 16];
                fmt = Some((
                    u16::from_le_bytes([f[0], f[1]]),
                    u16::from_le_bytes([f[2], f[3]]),
                    u32::from_le_bytes([f[4], f[5], f[6], f[7]]),
                    u16::from_le_bytes([f[14], f[15]]),
                ));
            }
            b"data" => {
                let start = pos + 8;
                let size = chunk_size.min(data.len() - start);
                data_chunk = Some((start, size));
                break;
            }
            _ => {}
        }

        pos = pos.saturating_add(8 + chunk_size);
        // 对齐到偶数字节
        if chunk_size % 2 != 0 {
            pos = pos.saturating_add(1);
        }
    }

    let (audio_format, num_channels, sample_rate, bits_per_sample) =
        fmt.ok_or_else(|| AudioCodecError::InvalidWav("missing fmt chunk".to_string()))?;

    let (data_start, data_size) = data_chunk
        .filter(|(_, size)| *size > 0)
        .ok_or_else(|| AudioCodecError::InvalidWav("missing data chunk".to_string()))?;

    Ok(WavHeader {
        audio_format,
        num_channels,
        sample_rate,
        bits_per_sample,
        data_start,
        data_size,
    })
}

/// f32 样本转 i16
///
/// 使用 32768 缩放，i16 -> f32 -> i16 可无损往返
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

/// 将 16-bit PCM 样本编码为 WAV（44 字节标准头）
pub fn encode_wav_i16(samples: &[i16], format: &PcmFormat) -> Vec<u8> {
    let bits_per_sample = PcmFormat::BITS_PER_SAMPLE;
    let num_channels = format.channels;
    let sample_rate = format.sample_rate;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);

    let data_size = samples.len() * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());

    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

/// 以标准 44 字节头重新封装已是目标格式的 PCM 数据
pub fn rewrap_pcm16(pcm_le: &[u8], format: &PcmFormat) -> Vec<u8> {
    let samples: Vec<i16> = pcm_le
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    encode_wav_i16(&samples, format)
}
