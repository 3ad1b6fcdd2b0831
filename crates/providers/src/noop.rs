use crate::{EmbedResponse, EmbeddingProvider, ProviderError};

/// Embedding provider that never reaches the network. Every call fails, so a
/// query run configured with it records an error entry per query.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for NoopProvider {
    async fn embed(&self, _texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}
