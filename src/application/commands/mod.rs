//! 应用层 - 命令
//!
//! clone_voice（写）与 generate_audio（读 + 合成）

mod clone_commands;

pub mod handlers;

pub use clone_commands::*;
