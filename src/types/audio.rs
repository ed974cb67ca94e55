//! Audio types: transcription, translation and speech synthesis.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::common::GroqMetadata;
use crate::errors::{GroqError, GroqResult};

/// Default model for transcription and translation.
pub const DEFAULT_AUDIO_MODEL: &str = "whisper-large-v3";

/// Default model for speech synthesis.
pub const DEFAULT_SPEECH_MODEL: &str = "playai-tts";

/// Default response format for speech synthesis.
pub const DEFAULT_SPEECH_FORMAT: &str = "wav";

/// Audio transcription request.
///
/// The file is referenced by path and read at request time; existence and
/// parameter ranges are checked locally before any network call.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Path to the audio file.
    pub file: PathBuf,

    /// Model ID.
    pub model: String,

    /// Language code (ISO 639-1). Whisper auto-detects when absent.
    pub language: Option<String>,

    /// Prompt to guide transcription (context, spelling of unknown words).
    pub prompt: Option<String>,

    /// Response format. `vtt` and `srt` are not supported.
    pub response_format: Option<AudioFormat>,

    /// Temperature (0.0-1.0).
    pub temperature: Option<f32>,
}

impl TranscriptionRequest {
    /// Creates a request for a file with the default model.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            model: DEFAULT_AUDIO_MODEL.to_string(),
            language: None,
            prompt: None,
            response_format: None,
            temperature: None,
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Sets the response format.
    #[must_use]
    pub fn response_format(mut self, format: AudioFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Validates the request without touching the network.
    pub fn validate(&self) -> GroqResult<()> {
        validate_audio_input(&self.file, self.temperature)
    }
}

/// Audio translation request (always translates to English).
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Path to the audio file.
    pub file: PathBuf,

    /// Model ID.
    pub model: String,

    /// Prompt to guide translation.
    pub prompt: Option<String>,

    /// Response format.
    pub response_format: Option<AudioFormat>,

    /// Temperature (0.0-1.0).
    pub temperature: Option<f32>,
}

impl TranslationRequest {
    /// Creates a request for a file with the default model.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            model: DEFAULT_AUDIO_MODEL.to_string(),
            prompt: None,
            response_format: None,
            temperature: None,
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Sets the response format.
    #[must_use]
    pub fn response_format(mut self, format: AudioFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Validates the request without touching the network.
    pub fn validate(&self) -> GroqResult<()> {
        validate_audio_input(&self.file, self.temperature)
    }
}

fn validate_audio_input(file: &Path, temperature: Option<f32>) -> GroqResult<()> {
    if file.as_os_str().is_empty() {
        return Err(GroqError::invalid_request("The file parameter is required"));
    }

    if !file.exists() {
        return Err(GroqError::invalid_request(format!(
            "The specified file does not exist: {}",
            file.display()
        )));
    }

    if let Some(temp) = temperature {
        if !(0.0..=1.0).contains(&temp) {
            return Err(GroqError::invalid_request(
                "temperature must be between 0 and 1",
            ));
        }
    }

    Ok(())
}

/// Audio response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// JSON with the transcription text.
    Json,
    /// Plain text.
    Text,
    /// JSON with timestamps for audio segments.
    VerboseJson,
}

impl AudioFormat {
    /// The wire name of this format.
    pub fn as_str(self) -> &'static str {
        match self {
            AudioFormat::Json => "json",
            AudioFormat::Text => "text",
            AudioFormat::VerboseJson => "verbose_json",
        }
    }
}

/// Transcription or translation result.
///
/// The segment fields are only populated for `verbose_json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Transcription {
    /// The transcribed or translated text.
    pub text: String,

    /// Detected or requested language.
    pub language: Option<String>,

    /// Audio duration in seconds.
    pub duration: Option<f64>,

    /// Timestamped segments (verbose_json only).
    pub segments: Option<Vec<Segment>>,

    /// Groq metadata.
    pub x_groq: Option<GroqMetadata>,
}

/// A timestamped segment of the transcription.
#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    /// Segment index.
    pub id: u32,

    /// Start time in seconds.
    pub start: f64,

    /// End time in seconds.
    pub end: f64,

    /// Segment text.
    pub text: String,
}

/// Result of a transcription or translation call.
///
/// `text` response format returns the raw body; everything else decodes to
/// a [`Transcription`].
#[derive(Debug, Clone)]
pub enum AudioResponse {
    /// Raw text body (`response_format == "text"`).
    Text(String),
    /// Decoded JSON body.
    Json(Transcription),
}

impl AudioResponse {
    /// The transcription text regardless of response format.
    pub fn text(&self) -> &str {
        match self {
            AudioResponse::Text(text) => text,
            AudioResponse::Json(transcription) => &transcription.text,
        }
    }
}

/// Speech synthesis request.
///
/// A value-type fluent builder: accumulate fields, then hand it to
/// `SpeechService::create` or `SpeechService::save`. No state is shared
/// across unrelated invocations.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    /// TTS model ID.
    pub model: String,

    /// The text to convert to speech.
    pub input: String,

    /// Voice identifier (e.g. "Bryan-PlayAI").
    pub voice: String,

    /// Audio response format.
    pub response_format: String,
}

impl SpeechRequest {
    /// Creates a request with default model and format.
    pub fn new() -> Self {
        Self {
            model: DEFAULT_SPEECH_MODEL.to_string(),
            input: String::new(),
            voice: String::new(),
            response_format: DEFAULT_SPEECH_FORMAT.to_string(),
        }
    }

    /// Sets the TTS model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the text input.
    #[must_use]
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Sets the voice.
    #[must_use]
    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Sets the response format.
    #[must_use]
    pub fn response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = format.into();
        self
    }

    /// Validates the request without touching the network.
    pub fn validate(&self) -> GroqResult<()> {
        if self.input.is_empty() {
            return Err(GroqError::validation("Input text is required"));
        }
        if self.voice.is_empty() {
            return Err(GroqError::validation("Voice is required"));
        }
        Ok(())
    }
}

impl Default for SpeechRequest {
    fn default() -> Self {
        Self::new()
    }
}
