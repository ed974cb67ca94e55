//! Service implementations for the Groq API.
//!
//! One service struct per API surface: chat completions, audio, speech,
//! vision, reasoning, models, files and batches. Services share the
//! transport and auth seams and normalize every backend failure through
//! [`GroqError::from_response`].

mod audio;
mod batches;
mod chat;
mod files;
mod images;
mod models;
mod reasoning;
mod speech;
mod vision;

pub use audio::AudioService;
pub use batches::BatchesService;
pub use chat::ChatService;
pub use files::FilesService;
pub use models::ModelsService;
pub use reasoning::{ReasoningOptions, ReasoningService};
pub use speech::SpeechService;
pub use vision::{VisionOptions, VisionService};

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::errors::{ErrorKind, GroqError, GroqResult};
use crate::transport::HttpResponse;

/// Builds the base headers for a request, applying auth and optionally the
/// JSON content type.
pub(crate) fn base_headers(
    auth: &Arc<dyn AuthProvider>,
    json_body: bool,
) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    if json_body {
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }
    auth.apply_auth(&mut headers);
    headers
}

/// Decodes a JSON response, normalizing non-2xx statuses into typed errors.
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    response: &HttpResponse,
) -> GroqResult<T> {
    ensure_success(response)?;
    response
        .json()
        .map_err(|e| GroqError::api(format!("Failed to parse response: {e}")))
}

/// Normalizes a non-2xx response into a typed error.
pub(crate) fn ensure_success(response: &HttpResponse) -> GroqResult<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(GroqError::from_response(
            response.status,
            &response.headers,
            &response.body,
        ))
    }
}

/// Appends query parameters to a path.
pub(crate) fn path_with_query(base: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    format!("{base}?{encoded}")
}

/// Translates 403 `permissions_error` responses into the plan-upgrade
/// message for gated features (files, batches). A policy layered above the
/// generic normalizer, not baked into it.
pub(crate) fn translate_permissions_error(error: GroqError, feature: &str) -> GroqError {
    let is_permissions_error = error.code() == 403
        && error
            .response_body()
            .and_then(|b| b.get("error"))
            .and_then(|e| e.get("type"))
            .and_then(serde_json::Value::as_str)
            == Some("permissions_error");

    if is_permissions_error {
        let headers = error.headers().clone();
        GroqError::new(
            ErrorKind::AuthenticationError,
            format!(
                "{feature} is not available in your current Groq plan. \
                 Please upgrade your plan to use this feature."
            ),
            403,
        )
        .with_headers(headers)
    } else {
        error
    }
}
