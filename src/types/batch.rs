//! Asynchronous batch job entity.
//!
//! A [`Batch`] moves through a one-way state machine on the backend:
//! `validating → in_progress → finalizing → {completed | failed | expired}`,
//! with `cancelling → cancelled` reachable from the first two states via an
//! explicit cancel call. The client recognizes the closed status set and
//! rejects anything else; it does not enforce transitions locally.

use serde_json::Value;

use crate::errors::{GroqError, GroqResult};

/// Endpoints a batch may target at creation time.
pub const SUPPORTED_ENDPOINTS: [&str; 1] = ["/v1/chat/completions"];

/// Endpoints accepted inside batch input files. Audio transcription lines
/// are validated (url + language) even though batch creation itself is
/// currently chat-only.
pub const BATCH_INPUT_ENDPOINTS: [&str; 2] =
    ["/v1/chat/completions", "/v1/audio/transcriptions"];

/// Supported completion windows.
pub const SUPPORTED_COMPLETION_WINDOWS: [&str; 1] = ["24h"];

/// Maximum serialized size of batch metadata, in bytes.
pub const MAX_METADATA_BYTES: usize = 8 * 1024;

/// Lifecycle status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Input file is being validated.
    Validating,
    /// Requests are executing.
    InProgress,
    /// Output is being assembled.
    Finalizing,
    /// All requests finished; terminal.
    Completed,
    /// The batch failed; terminal.
    Failed,
    /// The completion window elapsed; terminal.
    Expired,
    /// A cancel was requested and is in flight.
    Cancelling,
    /// The batch was cancelled; terminal.
    Cancelled,
}

impl BatchStatus {
    /// All valid statuses, for error messages.
    pub const ALL: [BatchStatus; 8] = [
        BatchStatus::Validating,
        BatchStatus::InProgress,
        BatchStatus::Finalizing,
        BatchStatus::Completed,
        BatchStatus::Failed,
        BatchStatus::Expired,
        BatchStatus::Cancelling,
        BatchStatus::Cancelled,
    ];

    /// The wire name of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            BatchStatus::Validating => "validating",
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Finalizing => "finalizing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Expired => "expired",
            BatchStatus::Cancelling => "cancelling",
            BatchStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a wire name into a status, rejecting anything outside the
    /// closed set with a message listing the valid statuses.
    pub fn parse(name: &str) -> GroqResult<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                GroqError::invalid_request(format!(
                    "Invalid batch status: {name}. Valid statuses are: {}",
                    valid.join(", ")
                ))
            })
    }

    /// True once no further transitions can occur.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BatchStatus::Completed
                | BatchStatus::Failed
                | BatchStatus::Expired
                | BatchStatus::Cancelled
        )
    }
}

/// Per-batch request counters.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RequestCounts {
    /// Total requests in the batch.
    pub total: u32,
    /// Requests completed so far.
    pub completed: u32,
    /// Requests that failed.
    pub failed: u32,
}

/// An asynchronous batch job.
#[derive(Debug, Clone)]
pub struct Batch {
    id: String,
    object: String,
    endpoint: String,
    input_file_id: String,
    completion_window: String,
    status: BatchStatus,
    request_counts: RequestCounts,
    output_file_id: Option<String>,
    error_file_id: Option<String>,
    created_at: Option<i64>,
    completed_at: Option<i64>,
    expires_at: Option<i64>,
    errors: Option<Value>,
    metadata: Option<Value>,
}

impl Batch {
    /// Builds a batch from a backend response object, validating required
    /// fields, endpoint, completion window and status.
    pub fn from_value(data: &Value) -> GroqResult<Self> {
        let obj = data
            .as_object()
            .ok_or_else(|| GroqError::invalid_request("Batch payload must be an object"))?;

        let id = require_str(obj, "id")?;
        let object = require_str(obj, "object")?;
        let endpoint = require_str(obj, "endpoint")?;
        let input_file_id = require_str(obj, "input_file_id")?;
        let completion_window = require_str(obj, "completion_window")?;
        let status_name = require_str(obj, "status")?;

        if !SUPPORTED_ENDPOINTS.contains(&endpoint.as_str()) {
            return Err(GroqError::invalid_request(format!(
                "Invalid endpoint. Only {} is supported",
                SUPPORTED_ENDPOINTS.join(", ")
            )));
        }

        if !SUPPORTED_COMPLETION_WINDOWS.contains(&completion_window.as_str()) {
            return Err(GroqError::invalid_request(format!(
                "Invalid completion_window. Only {} is supported",
                SUPPORTED_COMPLETION_WINDOWS.join(", ")
            )));
        }

        let status = BatchStatus::parse(&status_name)?;

        let request_counts = obj
            .get("request_counts")
            .filter(|v| !v.is_null())
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(|e| GroqError::invalid_request(format!("Invalid request_counts: {e}")))?
            .unwrap_or_default();

        Ok(Self {
            id,
            object,
            endpoint,
            input_file_id,
            completion_window,
            status,
            request_counts,
            output_file_id: get_str(obj, "output_file_id"),
            error_file_id: get_str(obj, "error_file_id"),
            created_at: obj.get("created_at").and_then(Value::as_i64),
            completed_at: obj.get("completed_at").and_then(Value::as_i64),
            expires_at: obj.get("expires_at").and_then(Value::as_i64),
            errors: obj.get("errors").filter(|v| !v.is_null()).cloned(),
            metadata: obj.get("metadata").filter(|v| !v.is_null()).cloned(),
        })
    }

    /// Batch ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Object type.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Target endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// ID of the uploaded input file.
    pub fn input_file_id(&self) -> &str {
        &self.input_file_id
    }

    /// Completion window.
    pub fn completion_window(&self) -> &str {
        &self.completion_window
    }

    /// Current status.
    pub fn status(&self) -> BatchStatus {
        self.status
    }

    /// Request counters.
    pub fn request_counts(&self) -> &RequestCounts {
        &self.request_counts
    }

    /// ID of the output file, once available.
    pub fn output_file_id(&self) -> Option<&str> {
        self.output_file_id.as_deref()
    }

    /// ID of the error file, if any request failed.
    pub fn error_file_id(&self) -> Option<&str> {
        self.error_file_id.as_deref()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    /// Completion timestamp.
    pub fn completed_at(&self) -> Option<i64> {
        self.completed_at
    }

    /// Expiry timestamp.
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Batch-level errors reported by the backend.
    pub fn errors(&self) -> Option<&Value> {
        self.errors.as_ref()
    }

    /// Caller-supplied metadata.
    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}

/// A page of batches.
#[derive(Debug, Clone)]
pub struct BatchList {
    /// Object type (always "list").
    pub object: String,
    /// Batches on this page, each validated.
    pub data: Vec<Batch>,
}

impl BatchList {
    /// Builds a list from a backend response, wrapping every item into a
    /// validated [`Batch`].
    pub fn from_value(data: &Value) -> GroqResult<Self> {
        let object = data
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or("list")
            .to_string();
        let items = data
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| GroqError::invalid_request("Batch list payload must carry data"))?;

        let data = items.iter().map(Batch::from_value).collect::<GroqResult<_>>()?;
        Ok(Self { object, data })
    }
}

/// Parameters for creating a batch.
#[derive(Debug, Clone)]
pub struct CreateBatchParams {
    /// ID of the uploaded JSONL input file.
    pub input_file_id: String,
    /// Target endpoint; must be in [`SUPPORTED_ENDPOINTS`].
    pub endpoint: String,
    /// Completion window; must be in [`SUPPORTED_COMPLETION_WINDOWS`].
    pub completion_window: String,
    /// Optional metadata object, size-capped at [`MAX_METADATA_BYTES`].
    pub metadata: Option<Value>,
}

impl CreateBatchParams {
    /// Creates parameters for the chat completions endpoint with the 24h
    /// window.
    pub fn new(input_file_id: impl Into<String>) -> Self {
        Self {
            input_file_id: input_file_id.into(),
            endpoint: SUPPORTED_ENDPOINTS[0].to_string(),
            completion_window: SUPPORTED_COMPLETION_WINDOWS[0].to_string(),
            metadata: None,
        }
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the completion window.
    #[must_use]
    pub fn completion_window(mut self, window: impl Into<String>) -> Self {
        self.completion_window = window.into();
        self
    }

    /// Sets the metadata object.
    #[must_use]
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Validates the parameters locally, avoiding a wasted round-trip.
    pub fn validate(&self) -> GroqResult<()> {
        if self.input_file_id.is_empty() {
            return Err(GroqError::invalid_request(
                "Missing required parameter: input_file_id",
            ));
        }

        if !SUPPORTED_ENDPOINTS.contains(&self.endpoint.as_str()) {
            return Err(GroqError::invalid_request(format!(
                "Invalid endpoint. Only {} is supported",
                SUPPORTED_ENDPOINTS.join(", ")
            )));
        }

        if !SUPPORTED_COMPLETION_WINDOWS.contains(&self.completion_window.as_str()) {
            return Err(GroqError::invalid_request(format!(
                "Invalid completion_window. Only {} is supported",
                SUPPORTED_COMPLETION_WINDOWS.join(", ")
            )));
        }

        if let Some(metadata) = &self.metadata {
            if !metadata.is_object() && !metadata.is_null() {
                return Err(GroqError::invalid_request(
                    "Metadata must be an object or null",
                ));
            }
            let serialized = serde_json::to_vec(metadata)
                .map_err(|e| GroqError::invalid_request(format!("Invalid metadata: {e}")))?;
            if serialized.len() > MAX_METADATA_BYTES {
                return Err(GroqError::invalid_request(format!(
                    "Metadata exceeds maximum size of {MAX_METADATA_BYTES} bytes"
                )));
            }
        }

        Ok(())
    }

    /// The JSON payload sent to the backend.
    pub fn to_payload(&self) -> Value {
        let mut payload = serde_json::json!({
            "input_file_id": self.input_file_id,
            "endpoint": self.endpoint,
            "completion_window": self.completion_window,
        });
        if let (Some(map), Some(metadata)) = (payload.as_object_mut(), &self.metadata) {
            map.insert("metadata".to_string(), metadata.clone());
        }
        payload
    }
}

/// Parameters for listing batches.
#[derive(Debug, Clone, Default)]
pub struct ListBatchesParams {
    /// Page size (backend default 20).
    pub limit: Option<u32>,
    /// Cursor: list batches after this ID.
    pub after: Option<String>,
    /// Sort order (backend default "desc").
    pub order: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Only batches created at or after this unix timestamp.
    pub created_after: Option<i64>,
    /// Only batches created at or before this unix timestamp.
    pub created_before: Option<i64>,
}

impl ListBatchesParams {
    /// Builds the query string pairs, dropping unset parameters and merging
    /// the defaults.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![(
            "limit".to_string(),
            self.limit.unwrap_or(20).to_string(),
        )];
        if let Some(after) = &self.after {
            query.push(("after".to_string(), after.clone()));
        }
        query.push((
            "order".to_string(),
            self.order.clone().unwrap_or_else(|| "desc".to_string()),
        ));
        if let Some(status) = &self.status {
            query.push(("status".to_string(), status.clone()));
        }
        if let Some(created_after) = self.created_after {
            query.push(("created_after".to_string(), created_after.to_string()));
        }
        if let Some(created_before) = self.created_before {
            query.push(("created_before".to_string(), created_before.to_string()));
        }
        query
    }
}

fn require_str(
    obj: &serde_json::Map<String, Value>,
    field: &str,
) -> GroqResult<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GroqError::invalid_request(format!("Missing required field: {field}")))
}

fn get_str(obj: &serde_json::Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_string)
}
