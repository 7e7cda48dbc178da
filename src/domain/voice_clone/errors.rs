//! Voice Clone Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceCloneError {
    #[error("voice name must not be empty")]
    EmptyName,

    #[error("voice name exceeds {max} characters")]
    NameTooLong { max: usize },

    #[error("reference audio must not be empty")]
    EmptyReferenceAudio,
}
