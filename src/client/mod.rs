//! Groq API client.
//!
//! Provides the main client interface for interacting with the Groq API.

use std::sync::Arc;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{GroqConfig, GroqConfigBuilder};
use crate::errors::GroqResult;
use crate::services::{
    AudioService, BatchesService, ChatService, FilesService, ModelsService, ReasoningService,
    SpeechService, VisionService,
};
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main Groq client.
///
/// Owns the configuration and one service per API surface. Cheap to clone;
/// all clones share the same connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use groq_sdk::{GroqClient, ChatRequest, Message};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = GroqClient::builder()
///         .api_key("gsk_your_api_key")
///         .build()?;
///
///     let request = ChatRequest::new(
///         "llama-3.3-70b-versatile",
///         vec![Message::user("Hello, Groq!")],
///     );
///
///     let response = client.chat().create(request).await?;
///     println!("{}", response.content().unwrap_or_default());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct GroqClient {
    config: GroqConfig,
    chat: ChatService,
    audio: AudioService,
    speech: SpeechService,
    vision: VisionService,
    reasoning: ReasoningService,
    files: FilesService,
    batches: BatchesService,
    models: ModelsService,
}

impl GroqClient {
    /// Creates a new client builder.
    pub fn builder() -> GroqClientBuilder {
        GroqClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `GROQ_API_KEY` and optionally `GROQ_BASE_URL` and
    /// `GROQ_TIMEOUT`.
    pub fn from_env() -> GroqResult<Self> {
        GroqClientBuilder::from_config(GroqConfig::from_env()?).build()
    }

    /// Creates a client from an API key.
    pub fn from_api_key(api_key: impl Into<String>) -> GroqResult<Self> {
        GroqClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the chat completions service.
    pub fn chat(&self) -> &ChatService {
        &self.chat
    }

    /// Returns the audio transcription/translation service.
    pub fn audio(&self) -> &AudioService {
        &self.audio
    }

    /// Returns the speech synthesis service.
    pub fn speech(&self) -> &SpeechService {
        &self.speech
    }

    /// Returns the vision service.
    pub fn vision(&self) -> &VisionService {
        &self.vision
    }

    /// Returns the reasoning service.
    pub fn reasoning(&self) -> &ReasoningService {
        &self.reasoning
    }

    /// Returns the files service.
    pub fn files(&self) -> &FilesService {
        &self.files
    }

    /// Returns the batches service.
    pub fn batches(&self) -> &BatchesService {
        &self.batches
    }

    /// Returns the models service.
    pub fn models(&self) -> &ModelsService {
        &self.models
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Groq client.
pub struct GroqClientBuilder {
    config_builder: GroqConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl GroqClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: GroqConfigBuilder::new(),
            transport: None,
            auth: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: GroqConfig) -> Self {
        let mut config_builder = GroqConfigBuilder::new()
            .api_key(config.api_key())
            .base_url(&config.base_url)
            .timeout(config.timeout)
            .vision_model(&config.vision_model);
        for (name, value) in &config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            transport: None,
            auth: None,
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config_builder = self.config_builder.timeout_secs(secs);
        self
    }

    /// Adds a custom header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets the default vision model.
    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.vision_model(model);
        self
    }

    /// Sets a custom transport (test seam).
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GroqResult<GroqClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout)?
                    .with_default_headers(config.custom_headers.clone()),
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(auth) => auth,
            None => Arc::new(ApiKeyAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        let chat = ChatService::new(Arc::clone(&transport), Arc::clone(&auth));
        let audio = AudioService::new(Arc::clone(&transport), Arc::clone(&auth));
        let speech = SpeechService::new(Arc::clone(&transport), Arc::clone(&auth));
        let vision = VisionService::new(
            chat.clone(),
            Arc::clone(&transport),
            config.vision_model.clone(),
        );
        let reasoning = ReasoningService::new(chat.clone());
        let files = FilesService::new(Arc::clone(&transport), Arc::clone(&auth));
        let batches = BatchesService::new(Arc::clone(&transport), Arc::clone(&auth));
        let models = ModelsService::new(Arc::clone(&transport), Arc::clone(&auth));

        Ok(GroqClient {
            config,
            chat,
            audio,
            speech,
            vision,
            reasoning,
            files,
            batches,
            models,
        })
    }
}

impl Default for GroqClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockTransport;

    #[test]
    fn test_builder_requires_api_key() {
        let result = GroqClientBuilder::new().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_api_key() {
        let result = GroqClientBuilder::new().api_key("gsk_test_key_12345").build();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_client_with_mock_transport() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&serde_json::json!({
            "object": "list",
            "data": []
        }));

        let client = GroqClient::builder()
            .api_key("gsk_test_key")
            .transport(Arc::clone(&transport) as Arc<dyn HttpTransport>)
            .build()
            .unwrap();

        let models = client.models().list().await.unwrap();
        assert!(models.is_empty());
    }

    #[test]
    fn test_from_config_preserves_fields() {
        let config = GroqConfig::builder()
            .api_key("gsk_test_key")
            .base_url("https://proxy.internal/openai/v1")
            .vision_model("custom-vision-model")
            .build()
            .unwrap();

        let client = GroqClientBuilder::from_config(config).build().unwrap();
        assert_eq!(client.config().base_url, "https://proxy.internal/openai/v1/");
        assert_eq!(client.config().vision_model, "custom-vision-model");
    }
}
