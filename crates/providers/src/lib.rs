//! Remote service clients: embedding providers and the hosted chunk table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod noop;
pub mod openai;
pub mod supabase;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub vectors: Vec<Vec<f32>>,
}

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError>;
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    embeddings: HashMap<String, Arc<dyn EmbeddingProvider>>,
    pub preferred_embedding: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedding(mut self, name: &str, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embeddings.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred_embedding(mut self, name: &str) -> Self {
        self.preferred_embedding = Some(name.to_string());
        self
    }

    pub fn embedding(
        &self,
        name: Option<&str>,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred_embedding.clone())
            .ok_or_else(|| {
                ProviderError::UnknownProvider("no embedding provider configured".into())
            })?;
        self.embeddings
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}

/// Turns a non-2xx response into `RequestFailed` carrying status and body.
pub(crate) async fn ensure_success(
    resp: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ProviderError::RequestFailed(format!(
        "status {} body {:?}",
        status, body
    )))
}
