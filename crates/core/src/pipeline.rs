use crate::config::{AppConfig, ConfigError};
use crate::export::{self, BulkDocument, BulkInfo, QueryDocument, QueryInfo};
use crate::fetch::fetch_all_chunks;
use crate::grouping::{group_by_source, largest_sources};
use crate::models::{Chunk, QueryOutcome};
use crate::scan::{scan_concepts, top_concepts};
use crate::search::{semantic_search, substring_search, SearchError, SearchParams};
use crate::store::{ChunkStore, SupabaseStore};
use crate::taxonomy::{ConceptQuery, CONCEPT_KEYWORDS};
use anyhow::Context;
use futures::stream::{self, StreamExt};
use providers::noop::NoopProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::supabase::{SupabaseClient, SupabaseConfig};
use providers::{EmbeddingProvider, ProviderRegistry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default, Serialize)]
pub struct BulkSummary {
    pub total_chunks: usize,
    pub total_sources: usize,
    /// Rows the exact count reported but the paged fetch did not return.
    pub missing_rows: u64,
    pub bytes_written: u64,
    pub top_sources: Vec<(String, usize)>,
    pub top_concepts: Vec<(String, usize, usize)>,
}

#[derive(Debug, Default, Serialize)]
pub struct QuerySummary {
    pub total_queries: usize,
    pub successful_queries: usize,
    pub failed_queries: usize,
    pub bytes_written: u64,
}

pub fn build_store(config: &AppConfig) -> Result<SupabaseStore, ConfigError> {
    let (url, key) = config.database_credentials()?;
    let client = SupabaseClient::new(SupabaseConfig {
        url: url.to_string(),
        api_key: key.to_string(),
        table: config.database.table.clone(),
        match_function: config.database.match_function.clone(),
    });
    Ok(SupabaseStore::new(client))
}

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new().with_embedding("noop", Arc::new(NoopProvider));

    if let Ok(key) = config.embedding_api_key() {
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: key.to_string(),
            base_url: config.embeddings.base_url.clone(),
            embedding_model: config.embeddings.model.clone(),
        });
        reg = reg.with_embedding("openai", Arc::new(provider));
    }

    reg.set_preferred_embedding(&config.embeddings.provider)
}

/// Pure assembly of the bulk document from fetched rows.
pub fn build_bulk_document(
    chunks: &[Chunk],
    total_in_store: u64,
    max_listed_sources: usize,
) -> BulkDocument {
    let transcripts = group_by_source(chunks);
    let concept_analysis = scan_concepts(chunks, CONCEPT_KEYWORDS, max_listed_sources);
    BulkDocument {
        extraction_info: BulkInfo {
            schema: export::BULK_SCHEMA.to_string(),
            timestamp: export::timestamp(),
            total_chunks: chunks.len(),
            total_sources: transcripts.len(),
            total_in_store,
            source: export::BULK_SOURCE_LABEL.to_string(),
        },
        concept_analysis,
        transcripts,
    }
}

/// Dumps the whole table, grouped by transcript, with concept statistics.
pub async fn run_bulk_export(
    config: &AppConfig,
    store: &dyn ChunkStore,
    output: &Path,
) -> anyhow::Result<BulkSummary> {
    let total_in_store = match store.count().await {
        Ok(n) => {
            info!("Connected. Total chunks in store: {}", n);
            n
        }
        Err(e) => {
            warn!("Could not get exact count: {}", e);
            0
        }
    };

    info!("Extracting all chunks...");
    let chunks = fetch_all_chunks(store, config.database.page_size).await?;
    info!("Extracted {} chunks", chunks.len());
    let fetched = chunks.len() as u64;
    if total_in_store > 0 && fetched != total_in_store {
        warn!(
            fetched,
            total_in_store,
            page_size = config.database.page_size,
            "fetched row count differs from exact count; page_size may exceed the server's max rows"
        );
    }

    let doc = build_bulk_document(&chunks, total_in_store, config.exporter.max_listed_sources);
    info!(
        "Found {} unique sources, analysed {} concepts",
        doc.transcripts.len(),
        doc.concept_analysis.len()
    );

    let bytes_written = export::write_document(output, &doc)
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        "Saved {} ({:.2} MB)",
        output.display(),
        bytes_written as f64 / (1024.0 * 1024.0)
    );

    let summary = BulkSummary {
        total_chunks: doc.extraction_info.total_chunks,
        total_sources: doc.extraction_info.total_sources,
        missing_rows: total_in_store.saturating_sub(fetched),
        bytes_written,
        top_sources: largest_sources(&doc.transcripts, 10)
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect(),
        top_concepts: top_concepts(&doc.concept_analysis, 15)
            .into_iter()
            .map(|(name, s)| (name.to_string(), s.total_mentions, s.unique_sources))
            .collect(),
    };
    for (i, (source, n)) in summary.top_sources.iter().enumerate() {
        info!("  {}. {}: {} chunks", i + 1, source, n);
    }
    for (concept, mentions, sources) in &summary.top_concepts {
        info!("  {}: {} mentions across {} sources", concept, mentions, sources);
    }
    Ok(summary)
}

async fn run_query(
    embedder: &dyn EmbeddingProvider,
    store: &dyn ChunkStore,
    query: &str,
    params: SearchParams,
) -> Result<(Vec<Chunk>, Vec<Chunk>), SearchError> {
    let semantic = semantic_search(embedder, store, query, params).await?;
    let keyword = substring_search(store, query, params.count).await?;
    Ok((semantic, keyword))
}

/// Runs every query with at most `concurrency` in flight. A failing query
/// becomes a `Failed` entry and does not affect the others.
pub async fn collect_query_outcomes(
    embedder: &dyn EmbeddingProvider,
    store: &dyn ChunkStore,
    queries: &[ConceptQuery],
    params: SearchParams,
    concurrency: usize,
) -> BTreeMap<String, QueryOutcome> {
    let total = queries.len();
    stream::iter(queries.iter().enumerate())
        .map(|(i, (concept, query))| async move {
            info!("[{}/{}] {}", i + 1, total, concept);
            let outcome = match run_query(embedder, store, query, params).await {
                Ok((semantic_results, keyword_results)) => {
                    info!(
                        concept = *concept,
                        semantic = semantic_results.len(),
                        keyword = keyword_results.len(),
                        "query done"
                    );
                    QueryOutcome::Found {
                        query: query.to_string(),
                        semantic_results,
                        keyword_results,
                    }
                }
                Err(e) => {
                    warn!(concept = *concept, error = %e, "query failed");
                    QueryOutcome::Failed {
                        query: query.to_string(),
                        error: e.to_string(),
                    }
                }
            };
            (concept.to_string(), outcome)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Hit counts per source transcript over all successful outcomes.
pub fn tally_sources(wisdom: &BTreeMap<String, QueryOutcome>) -> BTreeMap<String, usize> {
    let mut sources = BTreeMap::new();
    for outcome in wisdom.values() {
        if let QueryOutcome::Found {
            semantic_results,
            keyword_results,
            ..
        } = outcome
        {
            for chunk in semantic_results.iter().chain(keyword_results) {
                *sources.entry(chunk.source().to_string()).or_insert(0) += 1;
            }
        }
    }
    sources
}

/// Embeds and searches every query, then writes the keyed results.
pub async fn run_query_export(
    config: &AppConfig,
    embedder: &dyn EmbeddingProvider,
    store: &dyn ChunkStore,
    queries: &[ConceptQuery],
    output: &Path,
) -> anyhow::Result<QuerySummary> {
    let params = SearchParams {
        threshold: config.search.match_threshold,
        count: config.search.match_count,
    };
    info!(
        "Running {} concept queries (concurrency {})",
        queries.len(),
        config.exporter.concurrency
    );
    let wisdom =
        collect_query_outcomes(embedder, store, queries, params, config.exporter.concurrency)
            .await;
    let failed = wisdom.values().filter(|o| o.is_failure()).count();

    let doc = QueryDocument {
        extraction_info: QueryInfo {
            schema: export::QUERY_SCHEMA.to_string(),
            timestamp: export::timestamp(),
            total_queries: wisdom.len(),
            successful_queries: wisdom.len() - failed,
            failed_queries: failed,
            match_threshold: params.threshold,
            match_count: params.count,
            embedding_model: config.embeddings.model.clone(),
            source: export::QUERY_SOURCE_LABEL.to_string(),
        },
        sources: tally_sources(&wisdom),
        wisdom,
    };

    let bytes_written = export::write_document(output, &doc)
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        "Saved {} ({:.2} MB), {} of {} queries failed",
        output.display(),
        bytes_written as f64 / (1024.0 * 1024.0),
        failed,
        doc.extraction_info.total_queries
    );

    Ok(QuerySummary {
        total_queries: doc.extraction_info.total_queries,
        successful_queries: doc.extraction_info.successful_queries,
        failed_queries: failed,
        bytes_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_without_key_only_has_noop() {
        let mut cfg = AppConfig::default();
        let reg = build_registry(&cfg);
        assert!(reg.embedding(Some("noop")).is_ok());
        assert!(reg.embedding(None).is_err());

        cfg.embeddings.api_key = Some("sk-1".to_string());
        let reg = build_registry(&cfg);
        assert!(reg.embedding(None).is_ok());
    }

    #[test]
    fn store_requires_credentials() {
        let cfg = AppConfig::default();
        assert!(matches!(build_store(&cfg), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn bulk_document_counts_match_input() {
        let chunks: Vec<Chunk> = (0..6)
            .map(|i| Chunk {
                id: serde_json::json!(i),
                content: Some(if i % 2 == 0 { "Silver Bullet" } else { "noise" }.to_string()),
                source_transcript: Some(format!("t{}", i % 3)),
                chunk_index: Some(5 - i),
                similarity: None,
            })
            .collect();
        let doc = build_bulk_document(&chunks, 6, 20);
        assert_eq!(doc.extraction_info.schema, export::BULK_SCHEMA);
        assert_eq!(doc.extraction_info.total_chunks, 6);
        assert_eq!(doc.extraction_info.total_sources, 3);
        assert_eq!(doc.concept_analysis["silver_bullet"].total_mentions, 3);
    }
}
