//! Vision service: image analysis through vision-capable chat models.

use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use super::images;
use super::ChatService;
use crate::errors::{GroqError, GroqResult};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::chat::{ChatRequest, ChatResponse, Message};

/// Maximum size for a remote image, checked via a content-length preflight.
pub const MAX_REMOTE_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Maximum size for a local image re-encoded to base64.
pub const MAX_LOCAL_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

/// Options for a vision analysis call.
#[derive(Debug, Clone, Default)]
pub struct VisionOptions {
    /// Model override; defaults to the configured vision model.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Maximum completion tokens.
    pub max_tokens: Option<u32>,
}

/// Vision service.
#[derive(Clone)]
pub struct VisionService {
    chat: ChatService,
    transport: Arc<dyn HttpTransport>,
    default_model: String,
}

impl VisionService {
    /// Creates a new vision service.
    pub fn new(
        chat: ChatService,
        transport: Arc<dyn HttpTransport>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            transport,
            default_model: default_model.into(),
        }
    }

    /// Analyzes an image (local path or remote URL) with the default options.
    pub async fn analyze(
        &self,
        image: impl AsRef<str>,
        prompt: impl Into<String>,
    ) -> GroqResult<ChatResponse> {
        self.analyze_with_options(image, prompt, VisionOptions::default())
            .await
    }

    /// Analyzes an image with caller-supplied options.
    #[instrument(skip(self, image, prompt, options))]
    pub async fn analyze_with_options(
        &self,
        image: impl AsRef<str>,
        prompt: impl Into<String>,
        options: VisionOptions,
    ) -> GroqResult<ChatResponse> {
        let image_url = self.resolve_image(image.as_ref()).await?;

        let mut request = ChatRequest::new(
            options
                .model
                .unwrap_or_else(|| self.default_model.clone()),
            vec![Message::user_with_image(prompt, image_url)],
        );
        request.temperature = options.temperature;
        request.max_tokens = options.max_tokens;

        self.chat.create(request).await
    }

    /// Resolves the image source: data URIs pass through, remote URLs are
    /// size-checked via a HEAD preflight, local paths are base64-encoded
    /// under the local size cap.
    async fn resolve_image(&self, source: &str) -> GroqResult<String> {
        if images::is_data_uri(source) {
            return Ok(source.to_string());
        }

        if images::is_remote_url(source) {
            self.check_remote_size(source).await?;
            return Ok(source.to_string());
        }

        images::file_to_data_uri(Path::new(source), Some(MAX_LOCAL_IMAGE_BYTES)).await
    }

    /// Rejects remote images whose advertised content-length exceeds the
    /// cap. Hosts that do not answer HEAD with a length are let through;
    /// the backend enforces its own limit.
    async fn check_remote_size(&self, url: &str) -> GroqResult<()> {
        let response = self.transport.send(HttpRequest::head(url)).await?;

        if !response.is_success() {
            tracing::debug!(status = response.status, "image preflight not supported");
            return Ok(());
        }

        if let Some(length) = response.content_length() {
            if length > MAX_REMOTE_IMAGE_BYTES {
                return Err(GroqError::validation(format!(
                    "Remote image exceeds maximum size of {MAX_REMOTE_IMAGE_BYTES} bytes: \
                     {length} bytes"
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for VisionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionService")
            .field("default_model", &self.default_model)
            .finish()
    }
}
