//! 应用服务
//!
//! - scratch: 请求级临时文件
//! - clone_store: 克隆记录保存/查找
//! - normalizer: 参考音频规范化
//! - tts_adapter: 模型调用与结果编码

mod clone_store;
mod normalizer;
mod scratch;
mod tts_adapter;

pub use clone_store::{CloneRecord, CloneStore};
pub use normalizer::{AudioNormalizer, NormalizedAudio};
pub use scratch::ScratchSpace;
pub use tts_adapter::{round_to, SynthesizedAudio, TtsAdapter};
