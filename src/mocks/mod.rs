//! Mock implementations for testing.
//!
//! Provides a mock transport with queued responses and recorded requests,
//! so service behavior can be tested without real API calls.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest,
    StreamingResponse, TransportError,
};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body, for JSON requests.
    pub body: Option<Vec<u8>>,
    /// Multipart parts, for multipart requests.
    pub parts: Option<Vec<MultipartPart>>,
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a 200 JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates an error response in the backend's error shape.
    pub fn error(status: u16, error_type: &str, message: &str) -> Self {
        let error = serde_json::json!({
            "error": { "message": message, "type": error_type }
        });

        let mut response = Self::json(&error);
        response.status = status;
        response
    }

    /// Creates a 200 SSE response with the given body.
    pub fn sse(body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/event-stream".to_string());

        Self {
            status: 200,
            headers,
            body: body.as_bytes().to_vec(),
        }
    }

    /// Creates a 200 response with raw bytes (audio, file downloads).
    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body,
        }
    }

    /// Overrides the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

/// Mock HTTP transport with a FIFO response queue.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Creates an empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    /// Queues a 200 JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, error_type: &str, message: &str) {
        self.queue(MockResponse::error(status, error_type, message));
    }

    /// Returns all recorded requests in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn pop(&self) -> Result<MockResponse, TransportError> {
        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .ok_or_else(|| TransportError::InvalidResponse {
                message: "no mock response queued".to_string(),
            })
    }

    fn record(&self, request: RecordedRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: request.method,
            path: request.path,
            headers: request.headers,
            body: request.body,
            parts: None,
        });

        let response = self.pop()?;
        Ok(HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        self.record(RecordedRequest {
            method: request.method,
            path: request.path,
            headers: request.headers,
            body: request.body,
            parts: None,
        });

        let response = self.pop()?;
        let body = Bytes::from(response.body);
        Ok(StreamingResponse {
            status: response.status,
            headers: response.headers,
            stream: Box::pin(futures::stream::iter(vec![Ok(body)])),
        })
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: HttpMethod::Post,
            path: request.path,
            headers: request.headers,
            body: None,
            parts: Some(request.parts),
        });

        let response = self.pop()?;
        Ok(HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_are_served_in_order() {
        let transport = MockTransport::new();
        transport.queue_json(&serde_json::json!({"first": true}));
        transport.queue_json(&serde_json::json!({"second": true}));

        let first = transport.send(HttpRequest::get("a")).await.unwrap();
        let second = transport.send(HttpRequest::get("b")).await.unwrap();

        let first: serde_json::Value = first.json().unwrap();
        let second: serde_json::Value = second.json().unwrap();
        assert_eq!(first["first"], true);
        assert_eq!(second["second"], true);

        let requests = transport.requests();
        assert_eq!(requests[0].path, "a");
        assert_eq!(requests[1].path, "b");
    }

    #[tokio::test]
    async fn empty_queue_is_a_transport_error() {
        let transport = MockTransport::new();
        let result = transport.send(HttpRequest::get("a")).await;
        assert!(result.is_err());
    }
}
