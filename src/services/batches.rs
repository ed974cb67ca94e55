//! Batches service: asynchronous batch job management.

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::{base_headers, ensure_success, path_with_query, translate_permissions_error};
use crate::auth::AuthProvider;
use crate::errors::{GroqError, GroqResult};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::batch::{Batch, BatchList, CreateBatchParams, ListBatchesParams};

const BATCHES_PATH: &str = "batches";

const FEATURE: &str = "Batch processing";

/// Batches service.
#[derive(Clone)]
pub struct BatchesService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl BatchesService {
    /// Creates a new batches service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Creates a new batch for asynchronous processing.
    #[instrument(skip(self, params), fields(input_file_id = %params.input_file_id))]
    pub async fn create(&self, params: CreateBatchParams) -> GroqResult<Batch> {
        params.validate()?;

        let body = serde_json::to_vec(&params.to_payload())
            .map_err(|e| GroqError::invalid_request(format!("Failed to serialize request: {e}")))?;

        let mut request = HttpRequest::post(BATCHES_PATH).with_body(body);
        request.headers = base_headers(&self.auth, true);

        let response = self.transport.send(request).await?;
        ensure_success(&response).map_err(|e| translate_permissions_error(e, FEATURE))?;

        let value: Value = response.json().map_err(GroqError::from)?;
        Batch::from_value(&value)
    }

    /// Retrieves a batch by ID.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, batch_id: &str) -> GroqResult<Batch> {
        let value = self.get_json(&format!("{BATCHES_PATH}/{batch_id}")).await?;
        Batch::from_value(&value)
    }

    /// Lists batches, newest first by default.
    #[instrument(skip(self, params))]
    pub async fn list(&self, params: ListBatchesParams) -> GroqResult<BatchList> {
        let path = path_with_query(BATCHES_PATH, &params.to_query());
        let value = self.get_json(&path).await?;
        BatchList::from_value(&value)
    }

    /// Cancels a running batch.
    ///
    /// Only valid while the batch is validating or in progress; the backend
    /// moves it through `cancelling` to `cancelled`.
    #[instrument(skip(self))]
    pub async fn cancel(&self, batch_id: &str) -> GroqResult<Batch> {
        let mut request = HttpRequest::post(format!("{BATCHES_PATH}/{batch_id}/cancel"));
        request.headers = base_headers(&self.auth, false);

        let response = self.transport.send(request).await?;
        ensure_success(&response).map_err(|e| translate_permissions_error(e, FEATURE))?;

        let value: Value = response.json().map_err(GroqError::from)?;
        Batch::from_value(&value)
    }

    async fn get_json(&self, path: &str) -> GroqResult<Value> {
        let mut request = HttpRequest::get(path);
        request.headers = base_headers(&self.auth, false);

        let response = self.transport.send(request).await?;
        ensure_success(&response).map_err(|e| translate_permissions_error(e, FEATURE))?;
        response.json().map_err(GroqError::from)
    }
}

impl std::fmt::Debug for BatchesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchesService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiKeyAuth;
    use crate::errors::ErrorKind;
    use crate::mocks::MockTransport;
    use crate::types::batch::BatchStatus;

    fn service(transport: Arc<MockTransport>) -> BatchesService {
        BatchesService::new(transport, Arc::new(ApiKeyAuth::from_string("gsk_test")))
    }

    fn batch_payload(status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "batch_abc",
            "object": "batch",
            "endpoint": "/v1/chat/completions",
            "input_file_id": "file_abc",
            "completion_window": "24h",
            "status": status,
            "request_counts": { "total": 2, "completed": 0, "failed": 0 },
            "created_at": 1_700_000_000
        })
    }

    #[tokio::test]
    async fn create_posts_payload_and_returns_validated_batch() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&batch_payload("validating"));

        let batch = service(Arc::clone(&transport))
            .create(
                CreateBatchParams::new("file_abc")
                    .metadata(serde_json::json!({ "project": "demo" })),
            )
            .await
            .unwrap();

        assert_eq!(batch.id(), "batch_abc");
        assert_eq!(batch.status(), BatchStatus::Validating);

        let sent: serde_json::Value =
            serde_json::from_slice(transport.requests()[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent["input_file_id"], "file_abc");
        assert_eq!(sent["endpoint"], "/v1/chat/completions");
        assert_eq!(sent["completion_window"], "24h");
        assert_eq!(sent["metadata"]["project"], "demo");
    }

    #[tokio::test]
    async fn create_rejects_bad_completion_window_before_any_network_call() {
        let transport = Arc::new(MockTransport::new());

        let err = service(Arc::clone(&transport))
            .create(CreateBatchParams::new("file_abc").completion_window("48h"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(err.message().contains("completion_window"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn valid_completion_window_is_forwarded_unchanged() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&batch_payload("validating"));

        service(Arc::clone(&transport))
            .create(CreateBatchParams::new("file_abc").completion_window("24h"))
            .await
            .unwrap();

        let sent: serde_json::Value =
            serde_json::from_slice(transport.requests()[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent["completion_window"], "24h");
    }

    #[tokio::test]
    async fn retrieve_rejects_unknown_status_from_backend() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&batch_payload("bogus"));

        let err = service(Arc::clone(&transport))
            .retrieve("batch_abc")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(err.message().contains("Invalid batch status"));
    }

    #[tokio::test]
    async fn list_builds_query_and_wraps_every_item() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&serde_json::json!({
            "object": "list",
            "data": [batch_payload("completed"), batch_payload("in_progress")]
        }));

        let list = service(Arc::clone(&transport))
            .list(ListBatchesParams {
                status: Some("completed".to_string()),
                created_after: Some(1_690_000_000),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].status(), BatchStatus::Completed);

        let path = &transport.requests()[0].path;
        assert!(path.contains("limit=20"));
        assert!(path.contains("status=completed"));
        assert!(path.contains("created_after=1690000000"));
        assert!(!path.contains("created_before"));
    }

    #[tokio::test]
    async fn cancel_posts_to_cancel_path() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&batch_payload("cancelling"));

        let batch = service(Arc::clone(&transport)).cancel("batch_abc").await.unwrap();
        assert_eq!(batch.status(), BatchStatus::Cancelling);
        assert_eq!(transport.requests()[0].path, "batches/batch_abc/cancel");
    }

    #[tokio::test]
    async fn permissions_error_is_translated_to_plan_message() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_error(403, "permissions_error", "forbidden");

        let err = service(Arc::clone(&transport))
            .retrieve("batch_abc")
            .await
            .unwrap_err();

        assert_eq!(err.code(), 403);
        assert!(err.message().contains("Batch processing"));
        assert!(err.message().contains("upgrade your plan"));
    }
}
