//! Voice Clone Context - 声音克隆限界上下文
//!
//! 职责:
//! - 克隆记录（名称 + 原始参考音频）
//! - clone_id 生成与校验

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::VoiceClone;
pub use errors::VoiceCloneError;
pub use value_objects::{CloneId, VoiceName};
