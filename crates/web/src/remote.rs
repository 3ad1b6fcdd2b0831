use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Source filter chosen on the page. `All` searches the ICT corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    #[default]
    All,
    Ict,
    Vanessa,
}

impl SourceFilter {
    pub fn search_path(self) -> &'static str {
        match self {
            SourceFilter::All | SourceFilter::Ict => "/search/ict",
            SourceFilter::Vanessa => "/search/vanessa",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchHit {
    #[serde(default)]
    pub source_transcript: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<SearchHit>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SearchHit>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SearchHit>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Root probe body. `status` is kept as raw JSON; only the string
/// `"healthy"` counts as online.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusProbe {
    #[serde(default)]
    pub status: Option<Value>,
}

impl StatusProbe {
    pub fn is_healthy(&self) -> bool {
        self.status.as_ref().and_then(Value::as_str) == Some("healthy")
    }
}

/// Client for the remote knowledge-base search API. Bodies are decoded
/// regardless of status code; only transport and decode failures are errors.
#[derive(Clone)]
pub struct CortexApi {
    client: Client,
    base: String,
    limit: usize,
}

impl CortexApi {
    pub fn new(base: &str, limit: usize) -> Self {
        Self {
            client: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            limit,
        }
    }

    pub async fn status(&self) -> Result<StatusProbe, RemoteError> {
        let resp = self.client.get(&self.base).send().await?;
        Ok(resp.json().await?)
    }

    pub async fn search(
        &self,
        filter: SourceFilter,
        query: &str,
    ) -> Result<SearchResponse, RemoteError> {
        let url = format!("{}{}", self.base, filter.search_path());
        let resp = self
            .client
            .get(url)
            .query(&[("query", query.to_string()), ("limit", self.limit.to_string())])
            .send()
            .await?;
        Ok(resp.json().await?)
    }
}
