//! Output documents of the two exporters and the atomic JSON writer.

use crate::models::{ConceptStats, QueryOutcome, SourceGroup};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const BULK_SCHEMA: &str = "ict_wisdom/bulk";
pub const QUERY_SCHEMA: &str = "ict_wisdom/queries";
pub const BULK_SOURCE_LABEL: &str = "The Cortex - Complete ICT Knowledge Base";
pub const QUERY_SOURCE_LABEL: &str = "The Cortex - Concept Query Extraction";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkInfo {
    pub schema: String,
    pub timestamp: String,
    pub total_chunks: usize,
    pub total_sources: usize,
    /// Row count reported by the store before the fetch; 0 when unavailable.
    pub total_in_store: u64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDocument {
    pub extraction_info: BulkInfo,
    pub concept_analysis: BTreeMap<String, ConceptStats>,
    pub transcripts: BTreeMap<String, SourceGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInfo {
    pub schema: String,
    pub timestamp: String,
    pub total_queries: usize,
    pub successful_queries: usize,
    pub failed_queries: usize,
    pub match_threshold: f32,
    pub match_count: usize,
    pub embedding_model: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDocument {
    pub extraction_info: QueryInfo,
    /// Result hits per source transcript across all successful queries.
    pub sources: BTreeMap<String, usize>,
    pub wisdom: BTreeMap<String, QueryOutcome>,
}

pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Serializes `doc` as pretty JSON next to `path`, then renames it over
/// `path`. Returns the size of the written file in bytes.
pub fn write_document<T: Serialize>(path: &Path, doc: &T) -> anyhow::Result<u64> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, doc).context("serialize document")?;
        writer.flush().context("flush document")?;
    }
    tmp.as_file().sync_all().context("sync document")?;
    tmp.persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    let size = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    Ok(size)
}
