//! Voice Clone Context - Aggregate Root

use chrono::{DateTime, Utc};

use super::{CloneId, VoiceCloneError, VoiceName};

/// VoiceClone 聚合根
///
/// 不变量:
/// - 创建后不可变（无更新、无删除）
/// - reference_audio 保存上传时的原始编码，未经规范化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceClone {
    id: CloneId,
    name: VoiceName,
    reference_audio: Vec<u8>,
    created_at: Option<DateTime<Utc>>,
}

impl VoiceClone {
    /// 注册新的克隆，生成随机 clone_id
    pub fn register(name: VoiceName, reference_audio: Vec<u8>) -> Result<Self, VoiceCloneError> {
        if reference_audio.is_empty() {
            return Err(VoiceCloneError::EmptyReferenceAudio);
        }
        Ok(Self {
            id: CloneId::generate(&name),
            name,
            reference_audio,
            created_at: Some(Utc::now()),
        })
    }

    /// 从存储重建
    pub fn restore(
        id: CloneId,
        name: VoiceName,
        reference_audio: Vec<u8>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            reference_audio,
            created_at,
        }
    }

    // Getters
    pub fn id(&self) -> &CloneId {
        &self.id
    }

    pub fn name(&self) -> &VoiceName {
        &self.name
    }

    pub fn reference_audio(&self) -> &[u8] {
        &self.reference_audio
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}
