use crate::models::Chunk;
use providers::supabase::SupabaseClient;
use providers::ProviderError;

/// Read access to the hosted chunk table.
#[async_trait::async_trait]
pub trait ChunkStore: Send + Sync {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Chunk>, ProviderError>;

    async fn count(&self) -> Result<u64, ProviderError>;

    async fn search_substring(
        &self,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<Chunk>, ProviderError>;

    async fn match_similar(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> Result<Vec<Chunk>, ProviderError>;
}

pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl ChunkStore for SupabaseStore {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Chunk>, ProviderError> {
        self.client.select_range(offset, limit).await
    }

    async fn count(&self) -> Result<u64, ProviderError> {
        self.client.count_exact().await
    }

    async fn search_substring(
        &self,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<Chunk>, ProviderError> {
        self.client.search_content(needle, limit).await
    }

    async fn match_similar(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> Result<Vec<Chunk>, ProviderError> {
        self.client.match_rows(embedding, threshold, count).await
    }
}
