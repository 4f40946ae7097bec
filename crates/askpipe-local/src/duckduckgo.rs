//! Fallback search: DuckDuckGo instant-answer API.
//!
//! Returns at most one normalized result (the abstract), or nothing when the
//! API has no abstract for the query.

use askpipe_core::{Error, Result, SearchProvider, SearchResult, Source};
use serde::Deserialize;
use std::time::Instant;

const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";

#[derive(Debug, Clone)]
pub struct DuckDuckGoConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl DuckDuckGoConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = crate::env("ASKPIPE_DUCKDUCKGO_ENDPOINT") {
            cfg.endpoint = v;
        }
        cfg
    }
}

#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    config: DuckDuckGoConfig,
}

impl DuckDuckGoProvider {
    pub fn new(client: reqwest::Client, config: DuckDuckGoConfig) -> Self {
        Self { client, config }
    }
}

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
}

impl InstantAnswer {
    fn is_empty(&self) -> bool {
        self.heading.is_empty() && self.abstract_url.is_empty() && self.abstract_text.is_empty()
    }
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("no_redirect", "1"),
            ])
            .timeout(std::time::Duration::from_millis(self.config.timeout_ms))
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Search(format!("duckduckgo HTTP {status}")));
        }

        let parsed: InstantAnswer = resp.json().await.map_err(|e| Error::Search(e.to_string()))?;
        tracing::debug!(
            empty = parsed.is_empty(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "duckduckgo instant answer received"
        );
        if parsed.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![SearchResult {
            title: parsed.heading,
            url: parsed.abstract_url,
            snippet: parsed.abstract_text,
            source: Source::Duckduckgo,
        }])
    }
}
