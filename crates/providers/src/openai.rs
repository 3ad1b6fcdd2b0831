use crate::{ensure_success, EmbedResponse, EmbeddingProvider, ProviderError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    cfg: Arc<OpenAiConfig>,
}

impl OpenAiProvider {
    pub fn new(cfg: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }

    pub fn model(&self) -> &str {
        &self.cfg.embedding_model
    }
}

#[derive(Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        #[derive(serde::Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a [String],
        }

        let body = EmbedRequest {
            model: &self.cfg.embedding_model,
            input: texts,
        };

        let resp = self
            .client
            .post(format!(
                "{}/v1/embeddings",
                self.cfg.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let resp = ensure_success(resp).await?;

        let parsed: EmbeddingApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if parsed.data.len() != texts.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        Ok(EmbedResponse {
            vectors: parsed.data.into_iter().map(|d| d.embedding).collect(),
        })
    }
}
