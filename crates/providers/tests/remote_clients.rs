use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::supabase::{SupabaseClient, SupabaseConfig};
use providers::{EmbeddingProvider, ProviderError};
use serde_json::{json, Value};
use std::collections::HashMap;

const TABLE_SIZE: usize = 25;

fn row(i: usize) -> Value {
    let content = if i % 5 == 0 {
        format!("Row {} talks about the Silver Bullet", i)
    } else {
        format!("Row {} is filler", i)
    };
    json!({ "id": i, "content": content, "source_transcript": format!("t{}", i % 3), "chunk_index": i })
}

/// PostgREST rejects a request unless both `apikey` and the bearer token carry the key.
fn rejects_key(headers: &HeaderMap) -> Option<Response> {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if apikey == Some("anon") && bearer == Some("Bearer anon") {
        None
    } else {
        Some((StatusCode::UNAUTHORIZED, "invalid api key").into_response())
    }
}

async fn table(
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Some(denied) = rejects_key(&headers) {
        return denied;
    }
    if name != "ict_chunks" {
        return (StatusCode::NOT_FOUND, "no such table").into_response();
    }
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(TABLE_SIZE);
    let mut rows: Vec<Value> = (0..TABLE_SIZE).map(row).collect();
    if let Some(filter) = params.get("content") {
        let needle = filter
            .trim_start_matches("ilike.*")
            .trim_end_matches('*')
            .to_lowercase();
        rows.retain(|r| {
            r["content"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle)
        });
    }
    let page: Vec<Value> = rows.into_iter().skip(offset).take(limit).collect();
    let wants_count = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("count=exact"))
        .unwrap_or(false);
    if wants_count {
        let range = format!("0-{}/{}", page.len().saturating_sub(1), TABLE_SIZE);
        return ([(header::CONTENT_RANGE, range)], Json(page)).into_response();
    }
    Json(page).into_response()
}

async fn rpc(Path(name): Path<String>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Some(denied) = rejects_key(&headers) {
        return denied;
    }
    assert_eq!(name, "match_ict_chunks");
    let count = body["match_count"].as_u64().unwrap_or(0) as usize;
    let threshold = body["match_threshold"].as_f64().unwrap_or(1.0);
    let rows: Vec<Value> = (0..count)
        .map(|i| {
            let mut r = row(i);
            r["similarity"] = json!(0.9 - i as f64 * 0.1);
            r
        })
        .filter(|r| r["similarity"].as_f64().unwrap_or(0.0) > threshold)
        .collect();
    Json(rows).into_response()
}

async fn embeddings(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer sk-test");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    let inputs = body["input"].as_array().cloned().unwrap_or_default();
    let data: Vec<Value> = inputs
        .iter()
        .map(|_| json!({ "embedding": [0.1, 0.2, 0.3] }))
        .collect();
    Json(json!({ "data": data })).into_response()
}

async fn spawn_fake() -> String {
    let app = Router::new()
        .route("/rest/v1/{table}", get(table))
        .route("/rest/v1/rpc/{name}", post(rpc))
        .route("/v1/embeddings", post(embeddings));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn supabase(base: &str) -> SupabaseClient {
    supabase_with_key(base, "anon")
}

fn supabase_with_key(base: &str, key: &str) -> SupabaseClient {
    SupabaseClient::new(SupabaseConfig {
        url: base.to_string(),
        api_key: key.to_string(),
        table: "ict_chunks".to_string(),
        match_function: "match_ict_chunks".to_string(),
    })
}

#[tokio::test]
async fn select_range_returns_requested_window() {
    let base = spawn_fake().await;
    let client = supabase(&base);
    let rows: Vec<Value> = client.select_range(20, 10).await.unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["id"], json!(20));
}

#[tokio::test]
async fn count_exact_reads_content_range() {
    let base = spawn_fake().await;
    let client = supabase(&base);
    assert_eq!(client.count_exact().await.unwrap(), TABLE_SIZE as u64);
}

#[tokio::test]
async fn search_content_is_case_insensitive() {
    let base = spawn_fake().await;
    let client = supabase(&base);
    let rows: Vec<Value> = client.search_content("silver", 10).await.unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows
        .iter()
        .all(|r| r["content"].as_str().unwrap().contains("Silver")));
}

#[tokio::test]
async fn match_rows_passes_threshold_and_count() {
    let base = spawn_fake().await;
    let client = supabase(&base);
    let rows: Vec<Value> = client.match_rows(&[0.0; 3], 0.3, 10).await.unwrap();
    // 0.9, 0.8, ... 0.4 exceed the threshold; 0.3 and below do not.
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["similarity"], json!(0.9));
}

#[tokio::test]
async fn missing_table_is_a_request_failure() {
    let base = spawn_fake().await;
    let client = SupabaseClient::new(SupabaseConfig {
        url: base,
        api_key: "anon".to_string(),
        table: "nope".to_string(),
        match_function: "match_ict_chunks".to_string(),
    });
    let err = client.select_range::<Value>(0, 10).await.unwrap_err();
    assert!(matches!(err, ProviderError::RequestFailed(msg) if msg.contains("404")));
}

#[tokio::test]
async fn wrong_key_is_rejected_on_every_call() {
    let base = spawn_fake().await;
    let client = supabase_with_key(&base, "service-role-typo");
    let unauthorized =
        |err: ProviderError| matches!(err, ProviderError::RequestFailed(msg) if msg.contains("401"));

    assert!(unauthorized(client.select_range::<Value>(0, 10).await.unwrap_err()));
    assert!(unauthorized(client.count_exact().await.unwrap_err()));
    assert!(unauthorized(
        client.search_content::<Value>("silver", 10).await.unwrap_err()
    ));
    assert!(unauthorized(
        client.match_rows::<Value>(&[0.0; 3], 0.3, 10).await.unwrap_err()
    ));
}

#[tokio::test]
async fn openai_embeds_one_vector_per_input() {
    let base = spawn_fake().await;
    let provider = OpenAiProvider::new(OpenAiConfig {
        api_key: "sk-test".to_string(),
        base_url: base,
        embedding_model: "text-embedding-3-small".to_string(),
    });
    let resp = provider
        .embed(&["order blocks".to_string()])
        .await
        .unwrap();
    assert_eq!(resp.vectors, vec![vec![0.1, 0.2, 0.3]]);
}

#[tokio::test]
async fn openai_rejects_bad_key() {
    let base = spawn_fake().await;
    let provider = OpenAiProvider::new(OpenAiConfig {
        api_key: "wrong".to_string(),
        base_url: base,
        embedding_model: "text-embedding-3-small".to_string(),
    });
    let err = provider.embed(&["x".to_string()]).await.unwrap_err();
    assert!(matches!(err, ProviderError::RequestFailed(_)));
}
