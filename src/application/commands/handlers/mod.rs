//! Command Handlers 实现

mod clone_voice_handler;
mod generate_audio_handler;

pub use clone_voice_handler::*;
pub use generate_audio_handler::*;
