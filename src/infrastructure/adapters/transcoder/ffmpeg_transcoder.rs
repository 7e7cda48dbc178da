//! FFmpeg Transcoder - 调用 ffmpeg 子进程转码
//!
//! 输出固定为 pcm_s16le WAV，去掉元数据，便于重复规范化得到相同结果

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoderPort, TranscodeError, TranscoderKind};
use crate::audio::PcmFormat;

/// 错误信息中保留的 stderr 最大字符数
const MAX_DIAGNOSTIC_CHARS: usize = 2000;

/// FFmpeg 转码器配置
#[derive(Debug, Clone)]
pub struct FfmpegTranscoderConfig {
    /// ffmpeg 可执行文件路径
    pub ffmpeg_path: PathBuf,
}

impl Default for FfmpegTranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

/// FFmpeg 转码器
pub struct FfmpegTranscoder {
    config: FfmpegTranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: FfmpegTranscoderConfig) -> Self {
        Self { config }
    }

    fn build_args(input: &Path, output: &Path, target: &PcmFormat) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_owned());
        args.extend(
            [
                "-vn".to_string(),
                "-ac".to_string(),
                target.channels.to_string(),
                "-ar".to_string(),
                target.sample_rate.to_string(),
                "-acodec".to_string(),
                "pcm_s16le".to_string(),
                "-map_metadata".to_string(),
                "-1".to_string(),
                "-f".to_string(),
                "wav".to_string(),
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl AudioTranscoderPort for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        target: &PcmFormat,
    ) -> Result<(), TranscodeError> {
        tracing::debug!(
            ffmpeg = %self.config.ffmpeg_path.display(),
            input = %input.display(),
            target = %target,
            "Running ffmpeg"
        );

        let result = Command::new(&self.config.ffmpeg_path)
            .args(Self::build_args(input, output, target))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                TranscodeError::Spawn(format!("{}: {}", self.config.ffmpeg_path.display(), e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(TranscodeError::ToolFailed {
                status: result.status.to_string(),
                diagnostics: tail_chars(stderr.trim(), MAX_DIAGNOSTIC_CHARS),
            });
        }

        Ok(())
    }

    fn kind(&self) -> TranscoderKind {
        TranscoderKind::Ffmpeg
    }
}

/// 保留末尾 `max` 个字符（ffmpeg 的关键错误在最后）
fn tail_chars(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    text.chars().skip(count - max).collect()
}
