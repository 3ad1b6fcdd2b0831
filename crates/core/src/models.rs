use serde::{Deserialize, Serialize};

pub const UNKNOWN_SOURCE: &str = "unknown";

/// One row of the chunk table. `similarity` is only present on rows returned
/// by the similarity procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source_transcript: Option<String>,
    #[serde(default)]
    pub chunk_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl Chunk {
    pub fn source(&self) -> &str {
        self.source_transcript.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }

    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedChunk {
    pub id: serde_json::Value,
    pub content: Option<String>,
    pub chunk_index: Option<i64>,
}

/// All chunks of one source transcript, ordered by `chunk_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceGroup {
    pub source: String,
    pub chunks: Vec<GroupedChunk>,
    pub total_chunks: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptStats {
    pub total_mentions: usize,
    pub unique_sources: usize,
    pub sources: Vec<String>,
}

/// Per-query entry of the query document: either both result lists or the
/// error that stopped this query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Found {
        query: String,
        semantic_results: Vec<Chunk>,
        keyword_results: Vec<Chunk>,
    },
    Failed {
        query: String,
        error: String,
    },
}

impl QueryOutcome {
    pub fn query(&self) -> &str {
        match self {
            QueryOutcome::Found { query, .. } | QueryOutcome::Failed { query, .. } => query,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, QueryOutcome::Failed { .. })
    }
}
