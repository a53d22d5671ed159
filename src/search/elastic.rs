//! Minimal Elasticsearch client for sentence indexing and retrieval.

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use urlencoding::encode;

use crate::config::Settings;

/// Query strings are truncated to this length before submission.
pub const MAX_QUERY_LEN: usize = 1024;

const BULK_CHUNK: usize = 500;

/// One indexed corpus sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceDoc {
    pub file: String,
    pub line_id: usize,
    pub sentence: String,
}

/// A retrieval hit with its relevance score.
#[derive(Debug, Clone)]
pub struct Hit {
    pub doc: SentenceDoc,
    pub score: f64,
}

/// Thin HTTP client bound to one index.
#[derive(Debug, Clone)]
pub struct EsClient {
    http: Client,
    base_url: String,
    index: String,
}

impl EsClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .user_agent("cord-miner/0.1")
            .gzip(true)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.es_url.trim_end_matches('/').to_string(),
            index: settings.es_index.clone(),
        })
    }

    /// Create the index; an already-existing index is fine.
    pub async fn create_index(&self) -> Result<()> {
        let url = format!("{}/{}", self.base_url, self.index);
        let response = self.http.put(&url).send().await.context("create index")?;
        if !response.status().is_success() && response.status() != StatusCode::BAD_REQUEST {
            bail!("index creation failed with status {}", response.status());
        }
        info!(index = %self.index, "index ready");
        Ok(())
    }

    /// Delete the index; a missing index is fine.
    pub async fn delete_index(&self) -> Result<()> {
        let url = format!("{}/{}", self.base_url, self.index);
        let response = self.http.delete(&url).send().await.context("delete index")?;
        if !response.status().is_success()
            && response.status() != StatusCode::NOT_FOUND
            && response.status() != StatusCode::BAD_REQUEST
        {
            bail!("index deletion failed with status {}", response.status());
        }
        info!(index = %self.index, "index deleted");
        Ok(())
    }

    /// Bulk-index documents in NDJSON chunks, returning the indexed count.
    pub async fn bulk_index(&self, docs: &[SentenceDoc]) -> Result<usize> {
        let url = format!("{}/_bulk", self.base_url);
        let mut indexed = 0usize;
        for chunk in docs.chunks(BULK_CHUNK) {
            let mut body = String::new();
            for doc in chunk {
                body.push_str(&serde_json::json!({"index": {"_index": self.index}}).to_string());
                body.push('\n');
                body.push_str(&serde_json::to_string(doc)?);
                body.push('\n');
            }
            let response = self
                .http
                .post(&url)
                .header("content-type", "application/x-ndjson")
                .body(body)
                .send()
                .await
                .context("bulk request")?
                .error_for_status()
                .context("bulk indexing failed")?;
            let payload: BulkResponse = response.json().await.context("decode bulk response")?;
            if payload.errors {
                warn!(chunk = chunk.len(), "bulk response reported item errors");
            }
            indexed += chunk.len();
        }
        Ok(indexed)
    }

    /// Query-string search against one field, top-k hits.
    pub async fn search(&self, query: &str, field: &str, topk: usize) -> Result<Vec<Hit>> {
        let q = query_format(query, field);
        let url = format!(
            "{}/{}/_search?q={}&size={}",
            self.base_url,
            self.index,
            encode(&q),
            topk
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("search request")?
            .error_for_status()
            .context("search failed")?;
        let payload: SearchResponse = response.json().await.context("decode search response")?;
        Ok(payload
            .hits
            .hits
            .into_iter()
            .map(|hit| Hit {
                doc: hit.source,
                score: hit.score.unwrap_or_default(),
            })
            .collect())
    }
}

/// Build a query-string query: punctuation mapped to spaces, boolean `AND`
/// connectors removed so they are not parsed as operators, length capped.
pub fn query_format(query: &str, field: &str) -> String {
    let cleaned: String = query
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    let cleaned = cleaned.replace(" AND ", " ").replace(" and ", " ");
    let truncated: String = cleaned.chars().take(MAX_QUERY_LEN).collect();
    format!("{field}:({truncated})")
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: SearchHits,
}

#[derive(Debug, Deserialize, Default)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: SentenceDoc,
}
