//! GenerateAudio Handler
//!
//! 状态流转: Received → VoiceLookup → (NotFound | AudioNormalized → Synthesized → Encoded)

use std::sync::Arc;

use crate::application::commands::GenerateAudio;
use crate::application::envelope::{GenerateAudioResponse, Status};
use crate::application::error::HandlerError;
use crate::application::services::{AudioNormalizer, CloneStore, TtsAdapter};

/// GenerateAudio Handler
pub struct GenerateAudioHandler {
    store: CloneStore,
    normalizer: Arc<AudioNormalizer>,
    tts: Arc<TtsAdapter>,
}

impl GenerateAudioHandler {
    pub fn new(store: CloneStore, normalizer: Arc<AudioNormalizer>, tts: Arc<TtsAdapter>) -> Self {
        Self {
            store,
            normalizer,
            tts,
        }
    }

    pub async fn handle(&self, command: GenerateAudio) -> Result<GenerateAudioResponse, HandlerError> {
        if command.text.trim().is_empty() {
            return Err(HandlerError::invalid("text", "must not be empty"));
        }

        let clone = self
            .store
            .load(&command.voice_clone_id)
            .await?
            .ok_or_else(|| HandlerError::VoiceCloneNotFound(command.voice_clone_id.clone()))?;

        tracing::info!(
            clone_id = %clone.id(),
            text_len = command.text.chars().count(),
            text_preview = %preview(&command.text, 50),
            "Generating audio"
        );

        let reference = self
            .normalizer
            .normalize_to_scratch(clone.reference_audio())
            .await?;
        tracing::debug!(
            clone_id = %clone.id(),
            reference_secs = reference.duration_secs(),
            "Reference audio normalized"
        );

        let synthesized = self.tts.synthesize(&command.text, &reference).await?;
        drop(reference);

        tracing::info!(
            clone_id = %clone.id(),
            duration_secs = synthesized.duration_secs,
            sample_rate = synthesized.sample_rate,
            "Audio generated"
        );

        Ok(GenerateAudioResponse {
            audio_base64: synthesized.audio_base64,
            duration: synthesized.duration_secs,
            text: command.text,
            status: Status::Success,
        })
    }
}

/// 日志用文本截断
fn preview(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview
}
