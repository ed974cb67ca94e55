//! Uploaded file entity.
//!
//! A [`File`] is a read-only view over a validated backend response: fields
//! are checked once at construction and exposed through typed accessors.

use serde_json::Value;

use crate::errors::{GroqError, GroqResult};

/// The only purpose the backend accepts for uploads.
pub const FILE_PURPOSE_BATCH: &str = "batch";

/// Lifecycle status of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Uploaded, not yet picked up.
    Uploaded,
    /// Backend is processing the file.
    Processing,
    /// Ready for use.
    Processed,
    /// Processing failed.
    Failed,
    /// Backend-side error.
    Error,
    /// Deleted or expired.
    Deleted,
}

impl FileStatus {
    /// All valid statuses, for error messages.
    pub const ALL: [FileStatus; 6] = [
        FileStatus::Uploaded,
        FileStatus::Processing,
        FileStatus::Processed,
        FileStatus::Failed,
        FileStatus::Error,
        FileStatus::Deleted,
    ];

    /// The wire name of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Uploaded => "uploaded",
            FileStatus::Processing => "processing",
            FileStatus::Processed => "processed",
            FileStatus::Failed => "failed",
            FileStatus::Error => "error",
            FileStatus::Deleted => "deleted",
        }
    }

    /// Parses a wire name into a status.
    pub fn parse(name: &str) -> GroqResult<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                GroqError::invalid_request(format!(
                    "Invalid file status: {name}. Valid statuses are: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// An uploaded file.
#[derive(Debug, Clone)]
pub struct File {
    id: String,
    bytes: u64,
    created_at: i64,
    filename: String,
    purpose: String,
    status: FileStatus,
}

impl File {
    /// Builds a file from a backend response object, validating required
    /// fields, purpose and status. The backend may omit `status` on a fresh
    /// upload; it defaults to `uploaded`.
    pub fn from_value(data: &Value) -> GroqResult<Self> {
        let obj = data
            .as_object()
            .ok_or_else(|| GroqError::invalid_request("File payload must be an object"))?;

        let id = require_str(obj, "id")?;
        let bytes = obj
            .get("bytes")
            .and_then(Value::as_u64)
            .ok_or_else(|| missing_field("bytes"))?;
        let created_at = obj
            .get("created_at")
            .and_then(Value::as_i64)
            .ok_or_else(|| missing_field("created_at"))?;
        let filename = require_str(obj, "filename")?;
        let purpose = require_str(obj, "purpose")?;

        if created_at <= 0 {
            return Err(GroqError::invalid_request(
                "created_at must be a positive unix timestamp",
            ));
        }

        if purpose != FILE_PURPOSE_BATCH {
            return Err(GroqError::invalid_request(format!(
                "Invalid file purpose: {purpose}. Only '{FILE_PURPOSE_BATCH}' is supported."
            )));
        }

        let status = match obj.get("status").and_then(Value::as_str) {
            Some(name) => FileStatus::parse(name)?,
            None => FileStatus::Uploaded,
        };

        Ok(Self {
            id,
            bytes,
            created_at,
            filename,
            purpose,
            status,
        })
    }

    /// File ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// File size in bytes.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Creation time as a unix timestamp.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Original file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Upload purpose.
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Current status.
    pub fn status(&self) -> FileStatus {
        self.status
    }
}

/// A page of uploaded files.
#[derive(Debug, Clone)]
pub struct FileList {
    /// Object type (always "list").
    pub object: String,
    /// Files on this page, each validated.
    pub data: Vec<File>,
}

impl FileList {
    /// Builds a list from a backend response, wrapping every item into a
    /// validated [`File`].
    pub fn from_value(data: &Value) -> GroqResult<Self> {
        let object = data
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or("list")
            .to_string();
        let items = data
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| GroqError::invalid_request("File list payload must carry data"))?;

        let data = items.iter().map(File::from_value).collect::<GroqResult<_>>()?;
        Ok(Self { object, data })
    }
}

/// Deletion acknowledgement.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FileDeleted {
    /// File ID.
    pub id: String,
    /// Object type.
    pub object: String,
    /// Whether the file was deleted.
    pub deleted: bool,
}

/// Parameters for listing files.
#[derive(Debug, Clone, Default)]
pub struct ListFilesParams {
    /// Filter by purpose.
    pub purpose: Option<String>,
    /// Page size (backend default 20).
    pub limit: Option<u32>,
    /// Cursor: list files after this ID.
    pub after: Option<String>,
    /// Sort order (backend default "desc").
    pub order: Option<String>,
}

impl ListFilesParams {
    /// Builds the query string pairs, dropping unset parameters and merging
    /// the defaults.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(purpose) = &self.purpose {
            query.push(("purpose".to_string(), purpose.clone()));
        }
        query.push((
            "limit".to_string(),
            self.limit.unwrap_or(20).to_string(),
        ));
        if let Some(after) = &self.after {
            query.push(("after".to_string(), after.clone()));
        }
        query.push((
            "order".to_string(),
            self.order.clone().unwrap_or_else(|| "desc".to_string()),
        ));
        query
    }
}

fn missing_field(field: &str) -> GroqError {
    GroqError::invalid_request(format!("Missing required field: {field}"))
}

fn require_str(
    obj: &serde_json::Map<String, Value>,
    field: &str,
) -> GroqResult<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing_field(field))
}
