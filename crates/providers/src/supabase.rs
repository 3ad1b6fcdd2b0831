//! Minimal PostgREST client for the hosted chunk table.
//!
//! Covers the four calls the exporters make: offset/limit windows, an exact
//! row count, a case-insensitive `ilike` filter on `content`, and the
//! similarity stored procedure.

use crate::{ensure_success, ProviderError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub match_function: String,
}

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    cfg: SupabaseConfig,
}

impl SupabaseClient {
    pub fn new(cfg: SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            cfg,
        }
    }

    pub fn table(&self) -> &str {
        &self.cfg.table
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.cfg.url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.cfg.api_key)
            .bearer_auth(&self.cfg.api_key)
    }

    /// Rows `offset ..= offset + limit - 1` in the order the store returns them.
    pub async fn select_range<T: DeserializeOwned>(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>, ProviderError> {
        debug!(offset, limit, table = %self.cfg.table, "select range");
        let builder = self.client.get(self.rest_url(&self.cfg.table)).query(&[
            ("select", "*".to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ]);
        let resp = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let resp = ensure_success(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    /// Total row count as reported in the `Content-Range` header.
    pub async fn count_exact(&self) -> Result<u64, ProviderError> {
        let builder = self
            .client
            .get(self.rest_url(&self.cfg.table))
            .query(&[("select", "*"), ("limit", "1")])
            .header("Prefer", "count=exact");
        let resp = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let resp = ensure_success(resp).await?;
        let header = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ProviderError::InvalidResponse("missing Content-Range".into()))?;
        parse_content_range_total(header).ok_or_else(|| {
            ProviderError::InvalidResponse(format!("unparseable Content-Range {:?}", header))
        })
    }

    /// Up to `limit` rows whose `content` contains `needle`, ignoring case.
    pub async fn search_content<T: DeserializeOwned>(
        &self,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<T>, ProviderError> {
        let builder = self.client.get(self.rest_url(&self.cfg.table)).query(&[
            ("select", "*".to_string()),
            ("content", ilike_contains(needle)),
            ("limit", limit.to_string()),
        ]);
        let resp = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let resp = ensure_success(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    /// Calls the similarity procedure; ranking is whatever the store returns.
    pub async fn match_rows<T: DeserializeOwned>(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> Result<Vec<T>, ProviderError> {
        #[derive(Serialize)]
        struct MatchRequest<'a> {
            query_embedding: &'a [f32],
            match_threshold: f32,
            match_count: usize,
        }
        let body = MatchRequest {
            query_embedding: embedding,
            match_threshold: threshold,
            match_count: count,
        };
        let url = self.rest_url(&format!("rpc/{}", self.cfg.match_function));
        let resp = self
            .authorized(self.client.post(url).json(&body))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let resp = ensure_success(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

/// `ilike` filter value matching `needle` as a literal substring. `%`, `_`
/// and `\` are backslash-escaped. PostgREST rewrites every `*` to `%`, so a
/// literal `*` becomes the single-character wildcard `_`.
pub fn ilike_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 8);
    pattern.push_str("ilike.*");
    for ch in needle.chars() {
        match ch {
            '%' | '_' | '\\' => {
                pattern.push('\\');
                pattern.push(ch);
            }
            '*' => pattern.push('_'),
            c => pattern.push(c),
        }
    }
    pattern.push('*');
    pattern
}

/// `0-999/20829` and `*/0` both carry the total after the slash.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse().ok()
}
