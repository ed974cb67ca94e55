//! HTTP transport layer for the Groq client.
//!
//! Provides the transport abstraction used by every service, including
//! streaming and multipart variants. The transport never inspects response
//! JSON; error-body normalization happens above it.

mod http;
mod streaming;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};
pub use streaming::{ChatStream, SseLineDecoder, StreamingResponse};

use std::collections::HashMap;
use std::time::Duration;

use crate::errors::GroqError;

/// Multipart request for file uploads and audio endpoints.
#[derive(Debug, Clone)]
pub struct MultipartRequest {
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Multipart form parts.
    pub parts: Vec<MultipartPart>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

/// A part of a multipart form.
#[derive(Debug, Clone)]
pub enum MultipartPart {
    /// Text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field.
    File {
        /// Field name.
        name: String,
        /// File name.
        filename: String,
        /// Content type.
        content_type: String,
        /// File data.
        data: Vec<u8>,
    },
}

/// Transport error types.
///
/// These never escape to callers of the SDK; [`GroqError`] absorbs them via
/// the `From` impl below.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error (DNS, TLS, refused).
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// The response could not be read from the wire.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl From<TransportError> for GroqError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { timeout } => {
                GroqError::timeout(format!("Request timed out after {timeout:?}"))
            }
            TransportError::Connection { message }
            | TransportError::InvalidResponse { message } => GroqError::network(message),
        }
    }
}
