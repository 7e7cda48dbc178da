//! Voice Clone Context - Value Objects

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::VoiceCloneError;

/// clone_id 前缀
const ID_PREFIX: &str = "voice_";

/// id 中名称片段的最大长度
const MAX_ID_NAME_LEN: usize = 64;

/// 外部 id 的最大长度，`<id>.json` 需在文件名长度上限 (255 字节) 之内
const MAX_ID_LEN: usize = 200;

/// 克隆唯一标识，形如 `voice_<name>_<suffix>`
///
/// 不变量:
/// - 只包含 ASCII 字母数字、`-`、`_`，可直接作为存储 key / 文件名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CloneId(String);

impl CloneId {
    /// 使用操作系统 CSPRNG 生成新的 clone_id
    pub fn generate(name: &VoiceName) -> Self {
        Self::generate_with(name, &mut OsRng)
    }

    /// 使用指定的密码学安全随机源生成 clone_id
    ///
    /// 后缀为 64 bit 随机数的 16 位小写十六进制
    pub fn generate_with<R: RngCore + CryptoRng>(name: &VoiceName, rng: &mut R) -> Self {
        let suffix = rng.next_u64();
        Self(format!("{}{}_{:016x}", ID_PREFIX, name.key_segment(), suffix))
    }

    /// 校验外部传入的 id 是否为合法存储 key
    ///
    /// 非法 id（空、含路径分隔符、`..` 等）返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.len() > MAX_ID_LEN || !raw.chars().all(is_key_char) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CloneId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid clone id: {}", value))
    }
}

impl From<CloneId> for String {
    fn from(id: CloneId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CloneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// 克隆名称（用户提供的标签，不要求唯一）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    pub const MAX_LEN: usize = 100;

    pub fn new(name: impl Into<String>) -> Result<Self, VoiceCloneError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VoiceCloneError::EmptyName);
        }
        if name.chars().count() > Self::MAX_LEN {
            return Err(VoiceCloneError::NameTooLong { max: Self::MAX_LEN });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 用于 clone_id 的名称片段
    fn key_segment(&self) -> String {
        self.0
            .chars()
            .take(MAX_ID_NAME_LEN)
            .map(|c| if is_key_char(c) { c } else { '_' })
            .collect()
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_id_format() {
        let name = VoiceName::new("alice").unwrap();
        let id = CloneId::generate(&name);

        let suffix = id.as_str().strip_prefix("voice_alice_").unwrap();
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_same_name_never_collides() {
        let name = VoiceName::new("alice").unwrap();
        let ids: HashSet<_> = (0..10_000).map(|_| CloneId::generate(&name)).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_unsafe_name_is_sanitized() {
        let name = VoiceName::new("../Bob Smith/é").unwrap();
        let id = CloneId::generate(&name);
        assert!(id.as_str().starts_with("voice____Bob_Smith__"));
        assert!(CloneId::parse(id.as_str()).is_some());
    }

    #[test]
    fn test_parse_rejects_path_like_ids() {
        assert!(CloneId::parse("").is_none());
        assert!(CloneId::parse("../etc/passwd").is_none());
        assert!(CloneId::parse("voice_a/b").is_none());
        assert!(CloneId::parse("voice_alice_00ff").is_some());
    }

    #[test]
    fn test_parse_rejects_ids_too_long_for_a_file_name() {
        assert!(CloneId::parse(&format!("voice_{}", "a".repeat(194))).is_some());
        assert!(CloneId::parse(&format!("voice_{}", "a".repeat(195))).is_none());
        assert!(CloneId::parse(&format!("voice_{}", "a".repeat(250))).is_none());

        let longest = VoiceName::new("x".repeat(VoiceName::MAX_LEN)).unwrap();
        assert!(CloneId::parse(CloneId::generate(&longest).as_str()).is_some());
    }

    #[test]
    fn test_voice_name_validation() {
        assert!(VoiceName::new("").is_err());
        assert!(VoiceName::new("   ").is_err());
        assert!(VoiceName::new("x".repeat(101)).is_err());
        assert_eq!(VoiceName::new("爱丽丝").unwrap().as_str(), "爱丽丝");
    }
}
