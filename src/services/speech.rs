//! Text-to-speech service.

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use super::{base_headers, ensure_success};
use crate::auth::AuthProvider;
use crate::errors::{GroqError, GroqResult};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::audio::SpeechRequest;

const SPEECH_PATH: &str = "audio/speech";

/// Speech synthesis service.
#[derive(Clone)]
pub struct SpeechService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl SpeechService {
    /// Creates a new speech service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Synthesizes speech, returning the raw audio bytes.
    #[instrument(skip(self, request), fields(model = %request.model, voice = %request.voice))]
    pub async fn create(&self, request: SpeechRequest) -> GroqResult<Bytes> {
        request.validate()?;

        let body = serde_json::to_vec(&request)
            .map_err(|e| GroqError::invalid_request(format!("Failed to serialize request: {e}")))?;

        let mut http_request = HttpRequest::post(SPEECH_PATH).with_body(body);
        http_request.headers = base_headers(&self.auth, true);

        let response = self.transport.send(http_request).await?;
        ensure_success(&response)?;

        Ok(Bytes::from(response.body))
    }

    /// Synthesizes speech and writes the audio to a file.
    #[instrument(skip(self, request, path), fields(path = %path.as_ref().display()))]
    pub async fn save(&self, request: SpeechRequest, path: impl AsRef<Path>) -> GroqResult<()> {
        let audio = self.create(request).await?;
        tokio::fs::write(path.as_ref(), &audio).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SpeechService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiKeyAuth;
    use crate::errors::ErrorKind;
    use crate::mocks::{MockResponse, MockTransport};

    fn service(transport: Arc<MockTransport>) -> SpeechService {
        SpeechService::new(transport, Arc::new(ApiKeyAuth::from_string("gsk_test")))
    }

    fn request() -> SpeechRequest {
        SpeechRequest::new().input("Hello there").voice("Bryan-PlayAI")
    }

    #[tokio::test]
    async fn create_returns_audio_bytes() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::bytes(b"RIFF...wavdata".to_vec()));

        let audio = service(Arc::clone(&transport)).create(request()).await.unwrap();
        assert_eq!(&audio[..4], b"RIFF");

        let recorded = transport.requests();
        assert_eq!(recorded[0].path, SPEECH_PATH);
        let sent: serde_json::Value =
            serde_json::from_slice(recorded[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent["model"], "playai-tts");
        assert_eq!(sent["input"], "Hello there");
        assert_eq!(sent["voice"], "Bryan-PlayAI");
        assert_eq!(sent["response_format"], "wav");
    }

    #[tokio::test]
    async fn create_requires_input_and_voice_before_any_network_call() {
        let transport = Arc::new(MockTransport::new());

        let err = service(Arc::clone(&transport))
            .create(SpeechRequest::new().voice("Bryan-PlayAI"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn save_writes_audio_to_disk() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::bytes(b"wavbytes".to_vec()));

        let dir = std::env::temp_dir().join("groq_sdk_speech_test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("out.wav");

        service(Arc::clone(&transport))
            .save(request(), &path)
            .await
            .unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"wavbytes");
    }

    #[tokio::test]
    async fn backend_error_is_normalized() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_error(503, "service_unavailable", "try later");

        let err = service(Arc::clone(&transport)).create(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(err.code(), 503);
    }
}
