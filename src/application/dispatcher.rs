//! Operation Dispatcher - 请求分发
//!
//! 请求边界：任何下游错误（包括 panic）都在这里转换为 `{"error": ...}`，
//! 不会以未处理故障的形式终止 worker。

use async_trait::async_trait;
use futures_util::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;

use crate::application::commands::handlers::{CloneVoiceHandler, GenerateAudioHandler};
use crate::application::commands::{CloneVoice, GenerateAudio};
use crate::application::envelope::HandlerOutput;
use crate::application::error::{ErrorKind, HandlerError};

/// 缺失 operation 时错误信息中使用的名称
const MISSING_OPERATION: &str = "<missing>";

/// handler panic 时返回给调用方的固定信息
const PANICKED: &str = "handler panicked";

/// 支持的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CloneVoice,
    GenerateAudio,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CloneVoice => "clone_voice",
            Operation::GenerateAudio => "generate_audio",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "clone_voice" => Some(Operation::CloneVoice),
            "generate_audio" => Some(Operation::GenerateAudio),
            _ => None,
        }
    }
}

/// Job 处理器
///
/// job 调用框架（`start`）只依赖这个接口
#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    /// 处理一个完整的 job 事件 `{"input": {...}}`
    async fn handle_event(&self, event: &Value) -> HandlerOutput;
}

/// 操作分发器
pub struct OperationDispatcher {
    clone_voice: CloneVoiceHandler,
    generate_audio: GenerateAudioHandler,
}

impl OperationDispatcher {
    pub fn new(clone_voice: CloneVoiceHandler, generate_audio: GenerateAudioHandler) -> Self {
        Self {
            clone_voice,
            generate_audio,
        }
    }

    /// 分发 `input` 对象
    pub async fn dispatch(&self, input: &Value) -> HandlerOutput {
        let outcome = AssertUnwindSafe(self.route(input)).catch_unwind().await;

        let result = match outcome {
            Ok(result) => result,
            Err(panic) => {
                tracing::error!(panic = %panic_message(panic.as_ref()), "Handler panicked");
                Err(HandlerError::internal(PANICKED))
            }
        };

        match result {
            Ok(output) => output,
            Err(err) => {
                match err.kind() {
                    ErrorKind::InternalError => {
                        tracing::error!(kind = %err.kind(), error = %err, "Request failed")
                    }
                    _ => tracing::warn!(kind = %err.kind(), error = %err, "Request failed"),
                }
                HandlerOutput::from(&err)
            }
        }
    }

    async fn route(&self, input: &Value) -> Result<HandlerOutput, HandlerError> {
        let input = input
            .as_object()
            .ok_or_else(|| HandlerError::invalid("input", "expected a JSON object"))?;

        let operation = match input.get("operation") {
            None | Some(Value::Null) => {
                return Err(HandlerError::UnknownOperation(MISSING_OPERATION.to_string()))
            }
            Some(Value::String(name)) => Operation::parse(name)
                .ok_or_else(|| HandlerError::UnknownOperation(name.clone()))?,
            Some(other) => return Err(HandlerError::UnknownOperation(other.to_string())),
        };

        tracing::debug!(operation = operation.as_str(), "Dispatching request");

        match operation {
            Operation::CloneVoice => {
                let command = CloneVoice::from_input(input)?;
                Ok(self.clone_voice.handle(command).await?.into())
            }
            Operation::GenerateAudio => {
                let command = GenerateAudio::from_input(input)?;
                Ok(self.generate_audio.handle(command).await?.into())
            }
        }
    }
}

#[async_trait]
impl JobHandler for OperationDispatcher {
    async fn handle_event(&self, event: &Value) -> HandlerOutput {
        match event.get("input") {
            Some(input) => self.dispatch(input).await,
            None => {
                let err = HandlerError::MissingField("input");
                tracing::warn!(kind = %err.kind(), error = %err, "Request failed");
                HandlerOutput::from(&err)
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{SpeechModelError, SpeechModelPort, Waveform};
    use crate::application::services::{AudioNormalizer, CloneStore, ScratchSpace, TtsAdapter};
    use crate::audio::{encode_wav_i16, PcmFormat};
    use crate::infrastructure::adapters::{FakeSpeechModel, SymphoniaTranscoder};
    use crate::infrastructure::memory::InMemoryCloneStore;
    use crate::infrastructure::persistence::FileCloneStore;
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine;
    use serde_json::json;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn dispatcher_with(
        store: CloneStore,
        model: Arc<dyn SpeechModelPort>,
        scratch_dir: &Path,
    ) -> OperationDispatcher {
        let scratch = ScratchSpace::new(Some(scratch_dir.to_path_buf())).unwrap();
        let normalizer = Arc::new(AudioNormalizer::new(
            Arc::new(SymphoniaTranscoder::new()),
            scratch.clone(),
            PcmFormat::mono(24000),
        ));
        let tts = Arc::new(TtsAdapter::new(model, scratch, 2));
        OperationDispatcher::new(
            CloneVoiceHandler::new(store.clone()),
            GenerateAudioHandler::new(store, normalizer, tts),
        )
    }

    fn reference_b64() -> String {
        let wav = encode_wav_i16(&vec![500i16; 44100 * 2], &PcmFormat::new(44100, 2));
        BASE64_STANDARD.encode(wav)
    }

    #[tokio::test]
    async fn test_clone_then_generate() {
        let scratch = tempdir().unwrap();
        let model = Arc::new(FakeSpeechModel::new(24000));
        let store = CloneStore::new(Arc::new(InMemoryCloneStore::new()));
        let dispatcher = dispatcher_with(store, model.clone(), scratch.path());

        let cloned = dispatcher
            .handle_event(&json!({"input": {
                "operation": "clone_voice",
                "voice_name": "alice",
                "reference_audio_base64": reference_b64(),
            }}))
            .await
            .to_value();
        assert_eq!(cloned["status"], "success");
        assert_eq!(cloned["voice_name"], "alice");
        let clone_id = cloned["clone_id"].as_str().unwrap().to_string();
        assert!(clone_id.starts_with("voice_alice_"));

        let generated = dispatcher
            .handle_event(&json!({"input": {
                "operation": "generate_audio",
                "text": "Hello world",
                "voice_clone_id": clone_id,
            }}))
            .await
            .to_value();
        assert_eq!(generated["status"], "success");
        assert_eq!(generated["text"], "Hello world");
        assert!(generated["duration"].as_f64().unwrap() > 0.0);

        let wav = BASE64_STANDARD
            .decode(generated["audio_base64"].as_str().unwrap())
            .unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(model.calls(), 1);
        assert!(std::fs::read_dir(scratch.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_clone_visible_to_another_worker() {
        // 两个 dispatcher 共享同一存储目录，模拟两个 worker 进程
        let shared = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let worker_a = dispatcher_with(
            CloneStore::new(Arc::new(FileCloneStore::new(shared.path()).await.unwrap())),
            Arc::new(FakeSpeechModel::new(24000)),
            scratch.path(),
        );
        let worker_b = dispatcher_with(
            CloneStore::new(Arc::new(FileCloneStore::new(shared.path()).await.unwrap())),
            Arc::new(FakeSpeechModel::new(24000)),
            scratch.path(),
        );

        let cloned = worker_a
            .dispatch(&json!({
                "operation": "clone_voice",
                "voice_name": "bob",
                "reference_audio_base64": reference_b64(),
            }))
            .await
            .to_value();

        let generated = worker_b
            .dispatch(&json!({
                "operation": "generate_audio",
                "text": "Hi there",
                "voice_clone_id": cloned["clone_id"],
            }))
            .await
            .to_value();
        assert_eq!(generated["status"], "success");
    }

    #[tokio::test]
    async fn test_unknown_operation_touches_nothing() {
        let scratch = tempdir().unwrap();
        let backend = Arc::new(InMemoryCloneStore::new());
        let model = Arc::new(FakeSpeechModel::new(24000));
        let dispatcher = dispatcher_with(CloneStore::new(backend.clone()), model.clone(), scratch.path());

        let out = dispatcher
            .dispatch(&json!({"operation": "delete_voice", "voice_clone_id": "voice_a_0"}))
            .await;

        assert_eq!(out.to_value(), json!({"error": "Unknown operation: delete_voice"}));
        assert_eq!(backend.operation_count(), 0);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_operation_and_input() {
        let scratch = tempdir().unwrap();
        let dispatcher = dispatcher_with(
            CloneStore::new(Arc::new(InMemoryCloneStore::new())),
            Arc::new(FakeSpeechModel::new(24000)),
            scratch.path(),
        );

        let out = dispatcher.dispatch(&json!({"text": "hi"})).await;
        assert_eq!(out.to_value(), json!({"error": "Unknown operation: <missing>"}));

        let out = dispatcher.dispatch(&json!({"operation": null})).await;
        assert_eq!(out.to_value(), json!({"error": "Unknown operation: <missing>"}));

        let out = dispatcher.dispatch(&json!({"operation": 5})).await;
        assert_eq!(out.to_value(), json!({"error": "Unknown operation: 5"}));

        let out = dispatcher.handle_event(&json!({"operation": "clone_voice"})).await;
        assert_eq!(out.to_value(), json!({"error": "Missing required field: input"}));

        let out = dispatcher.dispatch(&json!("clone_voice")).await;
        assert!(!out.is_success());
    }

    #[tokio::test]
    async fn test_generate_with_unknown_clone() {
        let scratch = tempdir().unwrap();
        let model = Arc::new(FakeSpeechModel::new(24000));
        let dispatcher = dispatcher_with(
            CloneStore::new(Arc::new(InMemoryCloneStore::new())),
            model.clone(),
            scratch.path(),
        );

        let out = dispatcher
            .dispatch(&json!({
                "operation": "generate_audio",
                "text": "Hello world",
                "voice_clone_id": "voice_nobody_deadbeef",
            }))
            .await;

        assert_eq!(
            out.to_value(),
            json!({"error": "Voice clone not found: voice_nobody_deadbeef"})
        );
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_overlong_id_is_not_found_on_file_store() {
        let shared = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let dispatcher = dispatcher_with(
            CloneStore::new(Arc::new(FileCloneStore::new(shared.path()).await.unwrap())),
            Arc::new(FakeSpeechModel::new(24000)),
            scratch.path(),
        );

        let clone_id = format!("voice_{}", "a".repeat(250));
        let out = dispatcher
            .dispatch(&json!({
                "operation": "generate_audio",
                "text": "Hello world",
                "voice_clone_id": clone_id,
            }))
            .await;

        assert_eq!(
            out.to_value(),
            json!({"error": format!("Voice clone not found: {}", clone_id)})
        );
    }

    #[tokio::test]
    async fn test_store_failure_does_not_expose_volume_path() {
        let volume = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let clones_dir = volume.path().join("clones");
        let store = FileCloneStore::new(&clones_dir).await.unwrap();

        // 存储目录被替换为普通文件
        std::fs::remove_dir_all(&clones_dir).unwrap();
        std::fs::write(&clones_dir, b"not a directory").unwrap();

        let dispatcher = dispatcher_with(
            CloneStore::new(Arc::new(store)),
            Arc::new(FakeSpeechModel::new(24000)),
            scratch.path(),
        );
        let out = dispatcher
            .dispatch(&json!({
                "operation": "clone_voice",
                "voice_name": "dave",
                "reference_audio_base64": reference_b64(),
            }))
            .await
            .to_value();

        assert_eq!(out, json!({"error": "Internal error: clone storage unavailable"}));
        let volume_path = volume.path().display().to_string();
        assert!(!out.to_string().contains(&volume_path));
    }

    struct PanickingModel;

    #[async_trait]
    impl SpeechModelPort for PanickingModel {
        async fn generate(&self, _text: &str, _reference: &Path) -> Result<Waveform, SpeechModelError> {
            panic!("model blew up")
        }

        fn sample_rate(&self) -> u32 {
            24000
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_error_response() {
        let scratch = tempdir().unwrap();
        let store = CloneStore::new(Arc::new(InMemoryCloneStore::new()));
        let dispatcher = dispatcher_with(store, Arc::new(PanickingModel), scratch.path());

        let cloned = dispatcher
            .dispatch(&json!({
                "operation": "clone_voice",
                "voice_name": "carol",
                "reference_audio_base64": reference_b64(),
            }))
            .await
            .to_value();

        let out = dispatcher
            .dispatch(&json!({
                "operation": "generate_audio",
                "text": "boom",
                "voice_clone_id": cloned["clone_id"],
            }))
            .await
            .to_value();

        assert_eq!(out, json!({"error": "Internal error: handler panicked"}));
        // 展开栈时 scratch 文件同样被删除
        assert!(std::fs::read_dir(scratch.path()).unwrap().next().is_none());
    }
}
