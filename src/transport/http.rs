//! HTTP transport implementation.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::pin::Pin;
use std::time::Duration;
use tracing::instrument;

use super::{MultipartPart, MultipartRequest, StreamingResponse, TransportError};

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// DELETE request.
    Delete,
    /// HEAD request, used for content-length preflight checks.
    Head,
}

/// HTTP request representation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path, relative to the base URL.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a new GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a new DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Creates a new HEAD request.
    pub fn head(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Head, path)
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// The `content-length` header, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.headers.get("content-length").and_then(|v| v.parse().ok())
    }
}

/// HTTP transport trait.
///
/// The seam between services and the network; tests substitute a mock.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and buffer the full response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Send an HTTP request and return the response body as a byte stream.
    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError>;

    /// Send a multipart form request.
    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError>;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransportImpl {
    client: Client,
    base_url: String,
    default_headers: Vec<(String, String)>,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            default_headers: Vec::new(),
        })
    }

    /// Sets headers applied to every request; per-request headers win on
    /// collision.
    #[must_use]
    pub fn with_default_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.default_headers = headers;
        self
    }

    /// Builds the full URL for a path. Absolute URLs (the vision preflight
    /// against external image hosts) pass through untouched.
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request_builder(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let url = self.build_url(&request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
            HttpMethod::Head => self.client.head(&url),
        };

        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder
    }

    fn map_send_error(err: reqwest::Error, timeout: Option<Duration>) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout: timeout.unwrap_or(Duration::from_secs(60)),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::InvalidResponse {
                message: err.to_string(),
            }
        }
    }

    fn collect_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect()
    }

    async fn buffer_response(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let headers = Self::collect_headers(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                message: e.to_string(),
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let timeout = request.timeout;
        let response = self
            .request_builder(&request)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, timeout))?;

        Self::buffer_response(response).await
    }

    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        let timeout = request.timeout;
        let response = self
            .request_builder(&request)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, timeout))?;

        let status = response.status().as_u16();
        let headers = Self::collect_headers(&response);

        let stream = response.bytes_stream();
        let stream: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>> =
            Box::pin(futures::StreamExt::map(stream, |result| {
                result.map_err(|e| TransportError::InvalidResponse {
                    message: e.to_string(),
                })
            }));

        Ok(StreamingResponse {
            status,
            headers,
            stream,
        })
    }

    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut form = reqwest::multipart::Form::new();
        for part in request.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let part = reqwest::multipart::Part::bytes(data)
                        .file_name(filename)
                        .mime_str(&content_type)
                        .map_err(|e| TransportError::InvalidResponse {
                            message: e.to_string(),
                        })?;
                    form.part(name, part)
                }
            };
        }

        let mut builder = self.client.post(&url).multipart(form);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let timeout = request.timeout;
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, timeout))?;

        Self::buffer_response(response).await
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("base_url", &self.base_url)
            .finish()
    }
}
