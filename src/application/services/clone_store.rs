//! Clone Store - 克隆记录的保存与查找
//!
//! 记录格式: `{"name": ..., "audio_base64": ..., "created_at": ...}`，
//! key 为 clone_id。损坏的记录按不存在处理，并在日志中列出已知 key。

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::ports::{CloneStorePort, StoreError};
use crate::domain::{CloneId, VoiceClone, VoiceName};

/// 持久化记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRecord {
    pub name: String,
    pub audio_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&VoiceClone> for CloneRecord {
    fn from(clone: &VoiceClone) -> Self {
        Self {
            name: clone.name().as_str().to_string(),
            audio_base64: BASE64_STANDARD.encode(clone.reference_audio()),
            created_at: clone.created_at(),
        }
    }
}

impl CloneRecord {
    /// 还原为领域对象
    pub fn into_clone(self, id: CloneId) -> Result<VoiceClone, String> {
        let name = VoiceName::new(self.name).map_err(|e| e.to_string())?;
        let audio = BASE64_STANDARD
            .decode(self.audio_base64.as_bytes())
            .map_err(|e| format!("invalid audio_base64: {}", e))?;
        if audio.is_empty() {
            return Err("empty reference audio".to_string());
        }
        Ok(VoiceClone::restore(id, name, audio, self.created_at))
    }
}

/// 克隆存储服务
#[derive(Clone)]
pub struct CloneStore {
    backend: Arc<dyn CloneStorePort>,
}

impl CloneStore {
    pub fn new(backend: Arc<dyn CloneStorePort>) -> Self {
        Self { backend }
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    /// 持久化新克隆
    pub async fn save(&self, clone: &VoiceClone) -> Result<(), StoreError> {
        let record = CloneRecord::from(clone);
        let bytes =
            serde_json::to_vec(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.backend.put(clone.id(), &bytes).await?;

        tracing::info!(
            clone_id = %clone.id(),
            name = %clone.name(),
            record_size = bytes.len(),
            "Voice clone saved"
        );

        Ok(())
    }

    /// 按 id 查找克隆
    ///
    /// 非法 id、不存在、记录损坏均返回 `Ok(None)`；仅后端故障返回错误
    pub async fn load(&self, raw_id: &str) -> Result<Option<VoiceClone>, StoreError> {
        let Some(id) = CloneId::parse(raw_id) else {
            tracing::warn!(clone_id = %raw_id, "Rejected malformed clone id");
            return Ok(None);
        };

        let Some(bytes) = self.backend.get(&id).await? else {
            self.log_known_keys(&id, "record not found").await;
            return Ok(None);
        };

        let decoded = serde_json::from_slice::<CloneRecord>(&bytes)
            .map_err(|e| format!("invalid record json: {}", e))
            .and_then(|record| record.into_clone(id.clone()));

        match decoded {
            Ok(clone) => Ok(Some(clone)),
            Err(reason) => {
                self.log_known_keys(&id, &reason).await;
                Ok(None)
            }
        }
    }

    async fn log_known_keys(&self, id: &CloneId, reason: &str) {
        match self.backend.keys().await {
            Ok(keys) => tracing::warn!(
                clone_id = %id,
                reason = %reason,
                known_count = keys.len(),
                known = ?keys,
                "Voice clone unavailable"
            ),
            Err(e) => tracing::warn!(
                clone_id = %id,
                reason = %reason,
                error = %e,
                "Voice clone unavailable (failed to list known clones)"
            ),
        }
    }
}
