use crate::embeddings::embed_query;
use crate::models::Chunk;
use crate::store::ChunkStore;
use providers::{EmbeddingProvider, ProviderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("embedding failed: {0}")]
    Embedding(#[source] ProviderError),
    #[error("similarity search failed: {0}")]
    Similarity(#[source] ProviderError),
    #[error("keyword search failed: {0}")]
    Keyword(#[source] ProviderError),
}

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub threshold: f32,
    pub count: usize,
}

/// Embeds `query` and asks the store for rows above `params.threshold`.
/// Results keep the store's ranking.
pub async fn semantic_search(
    embedder: &dyn EmbeddingProvider,
    store: &dyn ChunkStore,
    query: &str,
    params: SearchParams,
) -> Result<Vec<Chunk>, SearchError> {
    let vector = embed_query(embedder, query)
        .await
        .map_err(SearchError::Embedding)?;
    store
        .match_similar(&vector, params.threshold, params.count)
        .await
        .map_err(SearchError::Similarity)
}

/// Rows containing the query's first word, ignoring case.
pub async fn substring_search(
    store: &dyn ChunkStore,
    query: &str,
    limit: usize,
) -> Result<Vec<Chunk>, SearchError> {
    let Some(word) = first_word(query) else {
        return Ok(Vec::new());
    };
    store
        .search_substring(word, limit)
        .await
        .map_err(SearchError::Keyword)
}

pub fn first_word(query: &str) -> Option<&str> {
    query.split_whitespace().next()
}
