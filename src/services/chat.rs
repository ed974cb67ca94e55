//! Chat completions service.

use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use super::{base_headers, decode_json, images};
use crate::auth::AuthProvider;
use crate::errors::{GroqError, GroqResult};
use crate::transport::{ChatStream, HttpRequest, HttpTransport, StreamingResponse};
use crate::types::chat::{ChatRequest, ChatResponse, Content, ContentPart};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Chat completions service.
#[derive(Clone)]
pub struct ChatService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Creates a chat completion, blocking until the full response arrives.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn create(&self, request: ChatRequest) -> GroqResult<ChatResponse> {
        request.validate()?;

        if request.stream == Some(true) {
            return Err(GroqError::invalid_request(
                "stream is enabled; use create_stream for streaming completions",
            ));
        }

        let request = self.prepare(request).await?;

        let http_request = self.build_request(&request, false)?;
        let response = self.transport.send(http_request).await?;

        decode_json(&response)
    }

    /// Creates a streaming chat completion.
    ///
    /// Returns once response headers arrive; the body is consumed lazily
    /// through the returned [`ChatStream`].
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn create_stream(&self, request: ChatRequest) -> GroqResult<ChatStream> {
        request.validate()?;
        let mut request = self.prepare(request).await?;
        request.stream = Some(true);

        let http_request = self.build_request(&request, true)?;
        let response = self.transport.send_streaming(http_request).await?;

        if response.status != 200 {
            return Err(Self::drain_error(response).await);
        }

        ChatStream::new(response)
    }

    /// Applies the documented request quirks before transmission: drops
    /// `response_format` when tools are present and inlines local images.
    async fn prepare(&self, request: ChatRequest) -> GroqResult<ChatRequest> {
        self.inline_local_images(request.normalized()).await
    }

    /// Rewrites every local-path `image_url` part to a base64 data URI.
    /// Remote URLs and existing data URIs pass through untouched.
    async fn inline_local_images(&self, mut request: ChatRequest) -> GroqResult<ChatRequest> {
        for message in &mut request.messages {
            let Content::Parts(parts) = &mut message.content else {
                continue;
            };
            for part in parts {
                if let ContentPart::ImageUrl { image_url } = part {
                    let url = image_url.url.as_str();
                    if images::is_data_uri(url) || images::is_remote_url(url) {
                        continue;
                    }
                    image_url.url = images::file_to_data_uri(Path::new(url), None).await?;
                }
            }
        }
        Ok(request)
    }

    fn build_request(&self, request: &ChatRequest, streaming: bool) -> GroqResult<HttpRequest> {
        let body = serde_json::to_vec(request)
            .map_err(|e| GroqError::invalid_request(format!("Failed to serialize request: {e}")))?;

        let mut headers = base_headers(&self.auth, true);
        if streaming {
            headers.insert("Accept".to_string(), "text/event-stream".to_string());
        }

        let mut http_request = HttpRequest::post(CHAT_COMPLETIONS_PATH).with_body(body);
        http_request.headers = headers;
        Ok(http_request)
    }

    /// Drains a failed streaming response and normalizes its error body.
    async fn drain_error(response: StreamingResponse) -> GroqError {
        let mut body = Vec::new();
        let mut stream = response.stream;
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => body.extend_from_slice(&bytes),
                Err(_) => break,
            }
        }
        GroqError::from_response(response.status, &response.headers, &body)
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService").finish()
    }
}
