//! CloneVoice Handler

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::application::commands::CloneVoice;
use crate::application::envelope::{CloneVoiceResponse, Status};
use crate::application::error::HandlerError;
use crate::application::ports::StoreError;
use crate::application::services::CloneStore;
use crate::domain::{VoiceClone, VoiceName};

/// id 冲突时的最大重试次数
const MAX_ID_ATTEMPTS: usize = 3;

/// CloneVoice Handler
pub struct CloneVoiceHandler {
    store: CloneStore,
}

impl CloneVoiceHandler {
    pub fn new(store: CloneStore) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: CloneVoice) -> Result<CloneVoiceResponse, HandlerError> {
        let name = VoiceName::new(command.voice_name)?;
        let audio = decode_reference_audio(&command.reference_audio_base64)?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let clone = VoiceClone::register(name.clone(), audio.clone())?;

            match self.store.save(&clone).await {
                Ok(()) => {
                    tracing::info!(
                        clone_id = %clone.id(),
                        name = %clone.name(),
                        audio_size = clone.reference_audio().len(),
                        "Voice cloned"
                    );
                    return Ok(CloneVoiceResponse {
                        clone_id: clone.id().to_string(),
                        voice_name: clone.name().to_string(),
                        status: Status::Success,
                    });
                }
                Err(StoreError::AlreadyExists(id)) => {
                    tracing::warn!(clone_id = %id, attempt = attempt, "Clone id collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(HandlerError::internal(
            "failed to allocate a unique clone id",
        ))
    }
}

/// 解码参考音频 base64
///
/// 忽略空白字符，接受 `data:<mime>;base64,` 前缀
fn decode_reference_audio(encoded: &str) -> Result<Vec<u8>, HandlerError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let audio = BASE64_STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| HandlerError::invalid("reference_audio_base64", e.to_string()))?;

    if audio.is_empty() {
        return Err(HandlerError::invalid(
            "reference_audio_base64",
            "decoded audio is empty",
        ));
    }

    Ok(audio)
}
