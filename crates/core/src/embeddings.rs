use providers::{EmbeddingProvider, ProviderError};

/// Embeds a single query. An empty vector counts as a provider failure.
pub async fn embed_query(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> Result<Vec<f32>, ProviderError> {
    let resp = provider.embed(&[text.to_string()]).await?;
    resp.vectors
        .into_iter()
        .next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("empty embedding".into()))
}
