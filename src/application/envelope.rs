//! Operation Envelope - 统一响应结构
//!
//! 成功结果带 `"status": "success"`，失败结果只有 `"error"`

use serde::Serialize;

use crate::application::error::HandlerError;

/// 成功标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

/// clone_voice 响应
#[derive(Debug, Clone, Serialize)]
pub struct CloneVoiceResponse {
    pub clone_id: String,
    pub voice_name: String,
    pub status: Status,
}

/// generate_audio 响应
#[derive(Debug, Clone, Serialize)]
pub struct GenerateAudioResponse {
    pub audio_base64: String,
    pub duration: f64,
    pub text: String,
    pub status: Status,
}

/// 错误响应
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 处理结果
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HandlerOutput {
    CloneVoice(CloneVoiceResponse),
    GenerateAudio(GenerateAudioResponse),
    Error(ErrorResponse),
}

impl HandlerOutput {
    pub fn is_success(&self) -> bool {
        !matches!(self, HandlerOutput::Error(_))
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Internal error: failed to serialize output: {}", e) })
        })
    }
}

impl From<&HandlerError> for HandlerOutput {
    fn from(err: &HandlerError) -> Self {
        HandlerOutput::Error(ErrorResponse {
            error: err.to_string(),
        })
    }
}

impl From<CloneVoiceResponse> for HandlerOutput {
    fn from(resp: CloneVoiceResponse) -> Self {
        HandlerOutput::CloneVoice(resp)
    }
}

impl From<GenerateAudioResponse> for HandlerOutput {
    fn from(resp: GenerateAudioResponse) -> Self {
        HandlerOutput::GenerateAudio(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shapes() {
        let out: HandlerOutput = CloneVoiceResponse {
            clone_id: "voice_alice_00".into(),
            voice_name: "alice".into(),
            status: Status::Success,
        }
        .into();
        assert_eq!(
            out.to_value(),
            json!({"clone_id": "voice_alice_00", "voice_name": "alice", "status": "success"})
        );

        let out: HandlerOutput = GenerateAudioResponse {
            audio_base64: "UklGRg==".into(),
            duration: 1.5,
            text: "Hello world".into(),
            status: Status::Success,
        }
        .into();
        assert_eq!(out.to_value()["duration"], json!(1.5));
        assert!(out.is_success());
    }

    #[test]
    fn test_error_shape() {
        let out = HandlerOutput::from(&HandlerError::UnknownOperation("delete_voice".into()));
        assert!(!out.is_success());
        assert_eq!(out.to_value(), json!({"error": "Unknown operation: delete_voice"}));
    }
}
