//! Files service: upload and manage batch input files.
//!
//! Every upload runs a local pre-flight: existence, size, extension,
//! content type and a line-by-line JSONL schema walk. Failing fast locally
//! avoids burning quota on files the backend would reject anyway.

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use super::{base_headers, ensure_success, path_with_query, translate_permissions_error};
use crate::auth::AuthProvider;
use crate::errors::{GroqError, GroqResult};
use crate::transport::{HttpRequest, HttpTransport, MultipartPart, MultipartRequest};
use crate::types::batch::BATCH_INPUT_ENDPOINTS;
use crate::types::file::{File, FileDeleted, FileList, ListFilesParams, FILE_PURPOSE_BATCH};

const FILES_PATH: &str = "files";

/// Maximum upload size.
pub const MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 1] = ["jsonl"];
const ALLOWED_CONTENT_TYPES: [&str; 2] = ["application/json", "text/plain"];

const FEATURE: &str = "The Files API";

/// Files service.
#[derive(Clone)]
pub struct FilesService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl FilesService {
    /// Creates a new files service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Uploads a batch input file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload(&self, path: impl AsRef<Path>, purpose: &str) -> GroqResult<File> {
        let path = path.as_ref();

        if purpose != FILE_PURPOSE_BATCH {
            return Err(GroqError::invalid_request(format!(
                "Invalid purpose. Only \"{FILE_PURPOSE_BATCH}\" is supported"
            )));
        }

        self.validate_upload(path).await?;

        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.jsonl")
            .to_string();
        let content_type = content_type_for(path).unwrap_or("application/octet-stream");

        let request = MultipartRequest {
            path: FILES_PATH.to_string(),
            headers: base_headers(&self.auth, false),
            parts: vec![
                MultipartPart::Text {
                    name: "purpose".to_string(),
                    value: purpose.to_string(),
                },
                MultipartPart::File {
                    name: "file".to_string(),
                    filename,
                    content_type: content_type.to_string(),
                    data,
                },
            ],
            timeout: None,
        };

        let response = self.transport.send_multipart(request).await?;
        ensure_success(&response).map_err(|e| translate_permissions_error(e, FEATURE))?;

        let value: Value = response.json().map_err(GroqError::from)?;
        File::from_value(&value)
    }

    /// Lists uploaded files.
    #[instrument(skip(self, params))]
    pub async fn list(&self, params: ListFilesParams) -> GroqResult<FileList> {
        let path = path_with_query(FILES_PATH, &params.to_query());
        let value: Value = self.get_json(&path).await?;
        FileList::from_value(&value)
    }

    /// Retrieves a file by ID.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, file_id: &str) -> GroqResult<File> {
        let value: Value = self.get_json(&format!("{FILES_PATH}/{file_id}")).await?;
        File::from_value(&value)
    }

    /// Deletes a file by ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, file_id: &str) -> GroqResult<FileDeleted> {
        let mut request = HttpRequest::delete(format!("{FILES_PATH}/{file_id}"));
        request.headers = base_headers(&self.auth, false);

        let response = self.transport.send(request).await?;
        ensure_success(&response).map_err(|e| translate_permissions_error(e, FEATURE))?;
        response.json().map_err(GroqError::from)
    }

    /// Downloads a file's content.
    #[instrument(skip(self))]
    pub async fn download(&self, file_id: &str) -> GroqResult<String> {
        let mut request = HttpRequest::get(format!("{FILES_PATH}/{file_id}/content"));
        request.headers = base_headers(&self.auth, false);

        let response = self.transport.send(request).await?;
        ensure_success(&response).map_err(|e| translate_permissions_error(e, FEATURE))?;

        String::from_utf8(response.body)
            .map_err(|e| GroqError::api(format!("File content is not valid UTF-8: {e}")))
    }

    async fn get_json(&self, path: &str) -> GroqResult<Value> {
        let mut request = HttpRequest::get(path);
        request.headers = base_headers(&self.auth, false);

        let response = self.transport.send(request).await?;
        ensure_success(&response).map_err(|e| translate_permissions_error(e, FEATURE))?;
        response.json().map_err(GroqError::from)
    }

    /// Local pre-flight checks, in order: existence, emptiness, size cap,
    /// extension, content type, JSONL content.
    async fn validate_upload(&self, path: &Path) -> GroqResult<()> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(_) => return Err(GroqError::invalid_request("File not found")),
        };

        if metadata.len() == 0 {
            return Err(GroqError::invalid_request("File is empty"));
        }

        validate_size(metadata.len())?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(GroqError::invalid_request(format!(
                "Invalid file extension: .{extension}. Only .jsonl files are supported"
            )));
        }

        match content_type_for(path) {
            Some(content_type) if ALLOWED_CONTENT_TYPES.contains(&content_type) => {}
            _ => {
                return Err(GroqError::invalid_request(
                    "Invalid file type. Only text/plain and application/json are supported",
                ));
            }
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| GroqError::invalid_request("Unable to read file"))?;
        validate_jsonl_content(&content)
    }
}

/// Rejects files over the size cap. Exactly at the cap passes.
fn validate_size(bytes: u64) -> GroqResult<()> {
    if bytes > MAX_FILE_BYTES {
        return Err(GroqError::invalid_request(
            "File size exceeds maximum limit of 100MB",
        ));
    }
    Ok(())
}

/// Content type derived from the file extension.
fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();
    match ext.as_str() {
        "jsonl" | "json" => Some("application/json"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Walks batch input content line by line. Every non-blank line must be
/// valid JSON and conform to the per-endpoint request schema; the first
/// violation aborts with a line-numbered error.
fn validate_jsonl_content(content: &str) -> GroqResult<()> {
    let mut request_count = 0usize;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        request_count += 1;

        let value: Value = serde_json::from_str(line).map_err(|e| {
            GroqError::invalid_request(format!("Invalid JSON on line {line_number}: {e}"))
        })?;

        validate_batch_request_line(line_number, &value)?;
    }

    if request_count == 0 {
        return Err(GroqError::invalid_request("File is empty"));
    }

    Ok(())
}

/// Checks one batch request object against the per-endpoint schema.
fn validate_batch_request_line(line_number: usize, value: &Value) -> GroqResult<()> {
    let fail = |message: &str| {
        Err(GroqError::invalid_request(format!(
            "Invalid request on line {line_number}: {message}"
        )))
    };

    let has_custom_id = value
        .get("custom_id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_custom_id {
        return fail("custom_id is required");
    }

    if value.get("method").and_then(Value::as_str) != Some("POST") {
        return fail("method must be POST");
    }

    let Some(url) = value.get("url").and_then(Value::as_str) else {
        return fail("url is required");
    };
    if !BATCH_INPUT_ENDPOINTS.contains(&url) {
        return fail(&format!(
            "url must be one of: {}",
            BATCH_INPUT_ENDPOINTS.join(", ")
        ));
    }

    let Some(body) = value.get("body").filter(|b| b.is_object()) else {
        return fail("body is required");
    };

    let has_model = body
        .get("model")
        .and_then(Value::as_str)
        .is_some_and(|m| !m.is_empty());
    if !has_model {
        return fail("body.model is required");
    }

    match url {
        "/v1/chat/completions" => {
            let has_messages = body
                .get("messages")
                .and_then(Value::as_array)
                .is_some_and(|m| !m.is_empty());
            if !has_messages {
                return fail("body.messages is required for chat completions");
            }
        }
        "/v1/audio/transcriptions" => {
            if body.get("url").and_then(Value::as_str).is_none()
                || body.get("language").and_then(Value::as_str).is_none()
            {
                return fail("body.url and body.language are required for audio transcriptions");
            }
        }
        _ => {}
    }

    Ok(())
}

impl std::fmt::Debug for FilesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesService").finish()
    }
}
