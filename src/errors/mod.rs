//! Error types for the Groq SDK.
//!
//! Every public operation either returns a well-typed value or fails with
//! [`GroqError`], a single error family carrying a machine-readable
//! [`ErrorKind`] and status code next to the human-readable message. Backend
//! error bodies of any shape are normalized through
//! [`GroqError::from_response`] into the same closed taxonomy.

use std::collections::HashMap;

use thiserror::Error;

/// Result type alias for Groq operations.
pub type GroqResult<T> = Result<T, GroqError>;

/// Closed taxonomy of error kinds.
///
/// Adding a backend error type means adding a variant and a row in the
/// normalization table, not new control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Request rejected before or by the backend as malformed.
    InvalidRequest,
    /// Generic backend failure.
    ApiError,
    /// Missing or rejected credentials.
    AuthenticationError,
    /// Too many requests or tokens.
    RateLimitError,
    /// Chat completion failed mid-flight (including stream decode failures).
    ChatCompletionError,
    /// Audio transcription or translation failed.
    TranscriptionError,
    /// Resource does not exist.
    NotFoundError,
    /// Request was well-formed but semantically unprocessable.
    UnprocessableEntity,
    /// The backend or transport timed out.
    TimeoutError,
    /// Backend temporarily unavailable.
    ServiceUnavailable,
    /// Backend wire name for a malformed request; normalized to
    /// [`ErrorKind::InvalidRequest`] but kept so unmapped responses parse.
    InvalidRequestError,
    /// Backend wire name for a bad key; normalized to
    /// [`ErrorKind::AuthenticationError`].
    InvalidApiKey,
    /// Transport-level failure: DNS, TLS, connect.
    NetworkError,
    /// The model produced output that failed a structured-output constraint.
    FailedGeneration,
    /// Local pre-flight validation failure; no request was sent.
    ValidationError,
}

impl ErrorKind {
    /// The wire name of this kind, as the backend spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::ApiError => "api_error",
            ErrorKind::AuthenticationError => "authentication_error",
            ErrorKind::RateLimitError => "rate_limit_error",
            ErrorKind::ChatCompletionError => "chat_completion_error",
            ErrorKind::TranscriptionError => "transcription_error",
            ErrorKind::NotFoundError => "not_found_error",
            ErrorKind::UnprocessableEntity => "unprocessable_entity",
            ErrorKind::TimeoutError => "timeout_error",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::InvalidRequestError => "invalid_request_error",
            ErrorKind::InvalidApiKey => "invalid_api_key",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::FailedGeneration => "failed_generation",
            ErrorKind::ValidationError => "validation_error",
        }
    }

    /// Parses a backend wire name into a kind, if it is one we know.
    pub fn from_wire(name: &str) -> Option<Self> {
        Some(match name {
            "invalid_request" => ErrorKind::InvalidRequest,
            "api_error" => ErrorKind::ApiError,
            "authentication_error" => ErrorKind::AuthenticationError,
            "rate_limit_error" => ErrorKind::RateLimitError,
            "chat_completion_error" => ErrorKind::ChatCompletionError,
            "transcription_error" => ErrorKind::TranscriptionError,
            "not_found_error" => ErrorKind::NotFoundError,
            "unprocessable_entity" => ErrorKind::UnprocessableEntity,
            "timeout_error" => ErrorKind::TimeoutError,
            "service_unavailable" => ErrorKind::ServiceUnavailable,
            "invalid_request_error" => ErrorKind::InvalidRequestError,
            "invalid_api_key" => ErrorKind::InvalidApiKey,
            "network_error" => ErrorKind::NetworkError,
            "failed_generation" => ErrorKind::FailedGeneration,
            "validation_error" => ErrorKind::ValidationError,
            _ => return None,
        })
    }

    /// Default HTTP status code associated with this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::InvalidRequest
            | ErrorKind::InvalidRequestError
            | ErrorKind::FailedGeneration
            | ErrorKind::ValidationError => 400,
            ErrorKind::AuthenticationError | ErrorKind::InvalidApiKey => 401,
            ErrorKind::NotFoundError => 404,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::RateLimitError => 429,
            ErrorKind::ApiError
            | ErrorKind::ChatCompletionError
            | ErrorKind::TranscriptionError => 500,
            ErrorKind::ServiceUnavailable | ErrorKind::NetworkError => 503,
            ErrorKind::TimeoutError => 504,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type raised by every operation in this crate.
///
/// Constructed at the detection site (HTTP failure, stream error, local
/// validation) and propagated unmodified to the caller; never retried.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct GroqError {
    kind: ErrorKind,
    message: String,
    code: u16,
    headers: HashMap<String, String>,
    response_body: Option<serde_json::Value>,
    failed_generation: Option<String>,
}

impl GroqError {
    /// Creates an error with an explicit kind, message and code.
    pub fn new(kind: ErrorKind, message: impl Into<String>, code: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            code,
            headers: HashMap::new(),
            response_body: None,
            failed_generation: None,
        }
    }

    /// Attaches response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Attaches the raw response body.
    #[must_use]
    pub fn with_response_body(mut self, body: serde_json::Value) -> Self {
        self.response_body = Some(body);
        self
    }

    /// The machine-readable kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The HTTP status code (or the kind's default for local errors).
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Response headers captured at the failure site.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The raw response body, kept when the backend type was unrecognized.
    pub fn response_body(&self) -> Option<&serde_json::Value> {
        self.response_body.as_ref()
    }

    /// The rejected generation attached to `failed_generation` errors.
    pub fn failed_generation(&self) -> Option<&str> {
        self.failed_generation.as_deref()
    }

    /// Machine-readable error details, in the backend's own shape.
    pub fn as_json(&self) -> serde_json::Value {
        let mut details = serde_json::json!({
            "message": self.message,
            "type": self.kind.as_str(),
            "code": self.code,
        });
        if let (Some(map), Some(fg)) = (details.as_object_mut(), &self.failed_generation) {
            map.insert(
                "failed_generation".to_string(),
                serde_json::Value::String(fg.clone()),
            );
        }
        serde_json::json!({ "error": details })
    }

    /// Creates an invalid-request error (code 400).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message, 400)
    }

    /// Creates a local validation error; no request was sent.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message, 400)
    }

    /// Creates an authentication error (code 401).
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationError, message, 401)
    }

    /// Creates a not-found error (code 404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundError, message, 404)
    }

    /// Creates an unprocessable-entity error (code 422).
    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnprocessableEntity, message, 422)
    }

    /// Creates a rate-limit error (code 429).
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimitError, message, 429)
    }

    /// Creates a generic backend error (code 500).
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ApiError, message, 500)
    }

    /// Creates a network error (code 503).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, message, 503)
    }

    /// Creates a timeout error (code 504).
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TimeoutError, message, 504)
    }

    /// Creates a chat-completion error, used for fatal stream failures.
    pub fn chat_completion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ChatCompletionError, message, 500)
    }

    /// Creates a transcription error, used for audio decode failures.
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TranscriptionError, message, 500)
    }

    /// Raised when the client is constructed without an API key.
    pub fn api_key_not_set() -> Self {
        Self::new(
            ErrorKind::AuthenticationError,
            "The API key is not set. Provide one when building the Groq client \
             or set the GROQ_API_KEY environment variable.",
            400,
        )
    }

    /// Normalizes an HTTP error response into a typed error.
    ///
    /// The dispatch table below is the closed enumeration of backend error
    /// types; anything unmatched falls through to a generic error that keeps
    /// the raw body and headers. Calling this twice on the same input yields
    /// the same kind, code and message.
    pub fn from_response(status: u16, headers: &HashMap<String, String>, body: &[u8]) -> Self {
        let Ok(raw) = serde_json::from_slice::<serde_json::Value>(body) else {
            return Self::new(ErrorKind::ApiError, "Invalid JSON response", 500)
                .with_headers(headers.clone());
        };

        let detail = raw.get("error");
        let message = detail
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        let wire_type = detail
            .and_then(|e| e.get("type"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or(ErrorKind::ApiError.as_str());
        let body_code = detail
            .and_then(|e| e.get("code"))
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u16::try_from(c).ok());
        let failed_generation = detail
            .and_then(|e| e.get("failed_generation"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        let error = match wire_type {
            "invalid_request_error" | "invalid_request" => Self::invalid_request(message),
            "invalid_api_key" => Self::authentication("Invalid API key provided."),
            "authentication_error" => Self::authentication(message),
            "not_found_error" => Self::not_found(message),
            "unprocessable_entity" => Self::unprocessable_entity(message),
            "rate_limit_error" => Self::rate_limit(message),
            "timeout_error" => Self::new(ErrorKind::TimeoutError, message, 504),
            "service_unavailable" => Self::new(ErrorKind::ServiceUnavailable, message, 503),
            "network_error" => {
                Self::new(ErrorKind::NetworkError, "A network error occurred", 503)
            }
            "failed_generation" => {
                let mut err = Self::new(ErrorKind::FailedGeneration, message, 400);
                err.failed_generation = failed_generation;
                err
            }
            other => {
                let kind = ErrorKind::from_wire(other).unwrap_or(ErrorKind::ApiError);
                Self::new(kind, message, body_code.unwrap_or(status)).with_response_body(raw)
            }
        };

        error.with_headers(headers.clone())
    }
}

impl From<reqwest::Error> for GroqError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_connect() {
            Self::network(err.to_string())
        } else {
            Self::new(
                ErrorKind::NetworkError,
                err.to_string(),
                err.status().map_or(503, |s| s.as_u16()),
            )
        }
    }
}

impl From<serde_json::Error> for GroqError {
    fn from(err: serde_json::Error) -> Self {
        Self::api(format!("Failed to decode JSON: {err}"))
    }
}

impl From<url::ParseError> for GroqError {
    fn from(err: url::ParseError) -> Self {
        Self::validation(format!("Invalid URL: {err}"))
    }
}

impl From<std::io::Error> for GroqError {
    fn from(err: std::io::Error) -> Self {
        Self::validation(format!("I/O error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn body(error_type: &str, message: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "error": { "message": message, "type": error_type }
        }))
        .unwrap()
    }

    #[test_case("invalid_request_error", ErrorKind::InvalidRequest, 400)]
    #[test_case("invalid_request", ErrorKind::InvalidRequest, 400)]
    #[test_case("authentication_error", ErrorKind::AuthenticationError, 401)]
    #[test_case("not_found_error", ErrorKind::NotFoundError, 404)]
    #[test_case("unprocessable_entity", ErrorKind::UnprocessableEntity, 422)]
    #[test_case("rate_limit_error", ErrorKind::RateLimitError, 429)]
    #[test_case("timeout_error", ErrorKind::TimeoutError, 504)]
    #[test_case("service_unavailable", ErrorKind::ServiceUnavailable, 503)]
    #[test_case("network_error", ErrorKind::NetworkError, 503)]
    #[test_case("failed_generation", ErrorKind::FailedGeneration, 400)]
    fn mapping_table(wire: &str, kind: ErrorKind, code: u16) {
        let err = GroqError::from_response(418, &HashMap::new(), &body(wire, "boom"));
        assert_eq!(err.kind(), kind);
        assert_eq!(err.code(), code);
    }

    #[test]
    fn invalid_api_key_uses_fixed_message() {
        let err = GroqError::from_response(
            401,
            &HashMap::new(),
            &body("invalid_api_key", "whatever the backend said"),
        );
        assert_eq!(err.kind(), ErrorKind::AuthenticationError);
        assert_eq!(err.message(), "Invalid API key provided.");
        assert_eq!(err.code(), 401);
    }

    #[test]
    fn network_error_uses_generic_message() {
        let err =
            GroqError::from_response(503, &HashMap::new(), &body("network_error", "details"));
        assert_eq!(err.message(), "A network error occurred");
    }

    #[test]
    fn failed_generation_carries_payload() {
        let body = serde_json::to_vec(&serde_json::json!({
            "error": {
                "message": "generation failed",
                "type": "failed_generation",
                "failed_generation": "{\"broken\": "
            }
        }))
        .unwrap();
        let err = GroqError::from_response(400, &HashMap::new(), &body);
        assert_eq!(err.kind(), ErrorKind::FailedGeneration);
        assert_eq!(err.failed_generation(), Some("{\"broken\": "));
    }

    #[test]
    fn unparseable_body_is_api_error() {
        let err = GroqError::from_response(502, &HashMap::new(), b"<html>bad gateway</html>");
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.message(), "Invalid JSON response");
        assert_eq!(err.code(), 500);
    }

    #[test]
    fn unknown_type_falls_through_preserving_body_and_headers() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), "req_123".to_string());
        let err = GroqError::from_response(451, &headers, &body("legal_block", "blocked"));
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.code(), 451);
        assert_eq!(err.message(), "blocked");
        assert!(err.response_body().is_some());
        assert_eq!(
            err.headers().get("x-request-id").map(String::as_str),
            Some("req_123")
        );
    }

    #[test]
    fn missing_error_object_uses_fallbacks() {
        let err = GroqError::from_response(500, &HashMap::new(), b"{\"detail\": \"oops\"}");
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.message(), "Unknown error");
        assert_eq!(err.code(), 500);
    }

    #[test]
    fn normalization_is_idempotent() {
        let payload = body("rate_limit_error", "slow down");
        let a = GroqError::from_response(429, &HashMap::new(), &payload);
        let b = GroqError::from_response(429, &HashMap::new(), &payload);
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.code(), b.code());
        assert_eq!(a.message(), b.message());
    }

    #[test]
    fn as_json_round_trips_details() {
        let err = GroqError::invalid_request("messages must not be empty");
        let json = err.as_json();
        assert_eq!(json["error"]["type"], "invalid_request");
        assert_eq!(json["error"]["code"], 400);
        assert_eq!(json["error"]["message"], "messages must not be empty");
    }

    #[test]
    fn wire_names_round_trip() {
        for kind in [
            ErrorKind::InvalidRequest,
            ErrorKind::ApiError,
            ErrorKind::AuthenticationError,
            ErrorKind::RateLimitError,
            ErrorKind::ChatCompletionError,
            ErrorKind::TranscriptionError,
            ErrorKind::NotFoundError,
            ErrorKind::UnprocessableEntity,
            ErrorKind::TimeoutError,
            ErrorKind::ServiceUnavailable,
            ErrorKind::InvalidRequestError,
            ErrorKind::InvalidApiKey,
            ErrorKind::NetworkError,
            ErrorKind::FailedGeneration,
            ErrorKind::ValidationError,
        ] {
            assert_eq!(ErrorKind::from_wire(kind.as_str()), Some(kind));
        }
    }
}
