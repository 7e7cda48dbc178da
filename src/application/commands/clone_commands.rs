//! Voice Clone Commands
//!
//! 从请求 `input` 对象中解析操作参数

use serde_json::{Map, Value};

use crate::application::error::HandlerError;

/// 注册克隆命令
#[derive(Debug, Clone)]
pub struct CloneVoice {
    pub voice_name: String,
    pub reference_audio_base64: String,
}

impl CloneVoice {
    pub fn from_input(input: &Map<String, Value>) -> Result<Self, HandlerError> {
        Ok(Self {
            voice_name: required_str(input, "voice_name")?,
            reference_audio_base64: required_str(input, "reference_audio_base64")?,
        })
    }
}

/// 生成音频命令
#[derive(Debug, Clone)]
pub struct GenerateAudio {
    pub text: String,
    pub voice_clone_id: String,
}

impl GenerateAudio {
    pub fn from_input(input: &Map<String, Value>) -> Result<Self, HandlerError> {
        Ok(Self {
            text: required_str(input, "text")?,
            voice_clone_id: required_str(input, "voice_clone_id")?,
        })
    }
}

/// 读取必填字符串字段（null 视为缺失）
fn required_str(input: &Map<String, Value>, field: &'static str) -> Result<String, HandlerError> {
    match input.get(field) {
        None | Some(Value::Null) => Err(HandlerError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(HandlerError::invalid(
            field,
            format!("expected a string, got {}", json_type(other)),
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
