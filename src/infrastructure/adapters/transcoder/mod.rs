//! Transcoder Adapter - 转码后端实现

mod ffmpeg_transcoder;
mod symphonia_transcoder;

pub use ffmpeg_transcoder::{FfmpegTranscoder, FfmpegTranscoderConfig};
pub use symphonia_transcoder::SymphoniaTranscoder;
