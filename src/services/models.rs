//! Models service.

use std::sync::Arc;
use tracing::instrument;

use super::{base_headers, decode_json};
use crate::auth::AuthProvider;
use crate::errors::{GroqError, GroqResult};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::models::{Model, ModelList};

const MODELS_PATH: &str = "models";

/// Models service for listing and retrieving model information.
#[derive(Clone)]
pub struct ModelsService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl ModelsService {
    /// Creates a new models service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Lists all available models.
    #[instrument(skip(self))]
    pub async fn list(&self) -> GroqResult<ModelList> {
        let mut request = HttpRequest::get(MODELS_PATH);
        request.headers = base_headers(&self.auth, false);

        let response = self.transport.send(request).await?;
        decode_json(&response)
    }

    /// Retrieves a specific model by ID.
    #[instrument(skip(self), fields(model = %model_id))]
    pub async fn retrieve(&self, model_id: &str) -> GroqResult<Model> {
        if model_id.is_empty() {
            return Err(GroqError::invalid_request("Model ID is required"));
        }

        let mut request = HttpRequest::get(format!("{MODELS_PATH}/{model_id}"));
        request.headers = base_headers(&self.auth, false);

        let response = self.transport.send(request).await?;
        decode_json(&response)
    }
}

impl std::fmt::Debug for ModelsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelsService").finish()
    }
}
