//! Audio transcription and translation service.

use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use super::{base_headers, ensure_success};
use crate::auth::AuthProvider;
use crate::errors::{GroqError, GroqResult};
use crate::transport::{HttpTransport, MultipartPart, MultipartRequest};
use crate::types::audio::{
    AudioFormat, AudioResponse, TranscriptionRequest, TranslationRequest,
};

const TRANSCRIPTIONS_PATH: &str = "audio/transcriptions";
const TRANSLATIONS_PATH: &str = "audio/translations";

/// Audio transcription and translation service.
#[derive(Clone)]
pub struct AudioService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl AudioService {
    /// Creates a new audio service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Transcribes spoken words in an audio file to text.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn transcribe(&self, request: TranscriptionRequest) -> GroqResult<AudioResponse> {
        request.validate()?;

        let mut parts = self
            .common_parts(&request.file, &request.model, request.prompt.as_deref())
            .await?;

        if let Some(language) = &request.language {
            parts.push(MultipartPart::Text {
                name: "language".to_string(),
                value: language.clone(),
            });
        }

        self.submit(TRANSCRIPTIONS_PATH, parts, request.response_format, request.temperature)
            .await
    }

    /// Translates spoken words in an audio file to English text.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn translate(&self, request: TranslationRequest) -> GroqResult<AudioResponse> {
        request.validate()?;

        let parts = self
            .common_parts(&request.file, &request.model, request.prompt.as_deref())
            .await?;

        self.submit(TRANSLATIONS_PATH, parts, request.response_format, request.temperature)
            .await
    }

    /// Builds the multipart fields shared by both endpoints.
    async fn common_parts(
        &self,
        file: &Path,
        model: &str,
        prompt: Option<&str>,
    ) -> GroqResult<Vec<MultipartPart>> {
        let data = tokio::fs::read(file).await?;
        let filename = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        let mut parts = vec![
            MultipartPart::File {
                name: "file".to_string(),
                filename: filename.clone(),
                content_type: detect_content_type(&filename),
                data,
            },
            MultipartPart::Text {
                name: "model".to_string(),
                value: model.to_string(),
            },
        ];

        if let Some(prompt) = prompt {
            parts.push(MultipartPart::Text {
                name: "prompt".to_string(),
                value: prompt.to_string(),
            });
        }

        Ok(parts)
    }

    async fn submit(
        &self,
        path: &str,
        mut parts: Vec<MultipartPart>,
        response_format: Option<AudioFormat>,
        temperature: Option<f32>,
    ) -> GroqResult<AudioResponse> {
        if let Some(format) = response_format {
            parts.push(MultipartPart::Text {
                name: "response_format".to_string(),
                value: format.as_str().to_string(),
            });
        }

        if let Some(temperature) = temperature {
            parts.push(MultipartPart::Text {
                name: "temperature".to_string(),
                value: temperature.to_string(),
            });
        }

        let request = MultipartRequest {
            path: path.to_string(),
            headers: base_headers(&self.auth, false),
            parts,
            timeout: None,
        };

        let response = self.transport.send_multipart(request).await?;
        ensure_success(&response)?;

        // Plain-text responses are returned as-is; everything else must
        // decode, and a decode failure is an error, not an empty result.
        if response_format == Some(AudioFormat::Text) {
            let text = String::from_utf8(response.body).map_err(|e| {
                GroqError::transcription(format!("Invalid UTF-8 in response: {e}"))
            })?;
            return Ok(AudioResponse::Text(text));
        }

        let transcription = serde_json::from_slice(&response.body).map_err(|e| {
            GroqError::transcription(format!("Error decoding the JSON response: {e}"))
        })?;
        Ok(AudioResponse::Json(transcription))
    }
}

/// Detects the audio content type from the file name.
fn detect_content_type(filename: &str) -> String {
    let ext = filename.rsplit('.').next().unwrap_or_default().to_lowercase();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "mp4" | "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        _ => "application/octet-stream",
    }
    .to_string()
}

impl std::fmt::Debug for AudioService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiKeyAuth;
    use crate::errors::ErrorKind;
    use crate::mocks::{MockResponse, MockTransport};
    use std::path::PathBuf;

    fn service(transport: Arc<MockTransport>) -> AudioService {
        AudioService::new(transport, Arc::new(ApiKeyAuth::from_string("gsk_test")))
    }

    async fn audio_fixture(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("groq_sdk_audio_service_test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join(name);
        tokio::fs::write(&path, b"RIFFfakewav").await.unwrap();
        path
    }

    #[tokio::test]
    async fn transcribe_builds_multipart_with_expected_fields() {
        let path = audio_fixture("speech.wav").await;
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&serde_json::json!({ "text": "hello" }));

        let response = service(Arc::clone(&transport))
            .transcribe(
                TranscriptionRequest::new(&path)
                    .language("en")
                    .temperature(0.2),
            )
            .await
            .unwrap();

        assert_eq!(response.text(), "hello");

        let recorded = transport.requests();
        assert_eq!(recorded[0].path, TRANSCRIPTIONS_PATH);
        let parts = recorded[0].parts.as_ref().unwrap();

        let mut fields = Vec::new();
        for part in parts {
            match part {
                MultipartPart::Text { name, value } => fields.push((name.clone(), value.clone())),
                MultipartPart::File {
                    name,
                    filename,
                    content_type,
                    ..
                } => {
                    assert_eq!(name, "file");
                    assert_eq!(filename, "speech.wav");
                    assert_eq!(content_type, "audio/wav");
                }
            }
        }
        assert!(fields.contains(&("model".to_string(), "whisper-large-v3".to_string())));
        assert!(fields.contains(&("language".to_string(), "en".to_string())));
        assert!(fields.contains(&("temperature".to_string(), "0.2".to_string())));
    }

    #[tokio::test]
    async fn transcribe_missing_file_fails_without_network() {
        let transport = Arc::new(MockTransport::new());

        let err = service(Arc::clone(&transport))
            .transcribe(TranscriptionRequest::new("/no/such/file.mp3"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn text_format_returns_raw_body() {
        let path = audio_fixture("speech2.wav").await;
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::bytes(b"plain transcription".to_vec()));

        let response = service(Arc::clone(&transport))
            .transcribe(TranscriptionRequest::new(&path).response_format(AudioFormat::Text))
            .await
            .unwrap();

        assert!(matches!(response, AudioResponse::Text(ref t) if t == "plain transcription"));
    }

    #[tokio::test]
    async fn json_decode_failure_is_fatal() {
        let path = audio_fixture("speech3.wav").await;
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::bytes(b"not json at all".to_vec()));

        let err = service(Arc::clone(&transport))
            .transcribe(TranscriptionRequest::new(&path))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TranscriptionError);
    }

    #[tokio::test]
    async fn translate_posts_to_translations_path() {
        let path = audio_fixture("speech4.wav").await;
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&serde_json::json!({ "text": "translated" }));

        let response = service(Arc::clone(&transport))
            .translate(TranslationRequest::new(&path))
            .await
            .unwrap();

        assert_eq!(response.text(), "translated");
        assert_eq!(transport.requests()[0].path, TRANSLATIONS_PATH);
    }

    #[test]
    fn content_type_detection() {
        assert_eq!(detect_content_type("a.mp3"), "audio/mpeg");
        assert_eq!(detect_content_type("a.m4a"), "audio/mp4");
        assert_eq!(detect_content_type("a.flac"), "audio/flac");
        assert_eq!(detect_content_type("a.xyz"), "application/octet-stream");
    }
}
