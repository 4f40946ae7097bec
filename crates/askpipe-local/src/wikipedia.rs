//! Encyclopedia search via the MediaWiki search API.

use askpipe_core::{EncyclopediaProvider, Error, Result, WikipediaSearch};
use std::time::Instant;

const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl WikipediaConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = crate::env("ASKPIPE_WIKIPEDIA_ENDPOINT") {
            cfg.endpoint = v;
        }
        cfg
    }
}

#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    config: WikipediaConfig,
}

impl WikipediaClient {
    pub fn new(client: reqwest::Client, config: WikipediaConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl EncyclopediaProvider for WikipediaClient {
    async fn search(&self, query: &str) -> Result<WikipediaSearch> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("format", "json"),
            ])
            .timeout(std::time::Duration::from_millis(self.config.timeout_ms))
            .send()
            .await
            .map_err(|e| Error::Wikipedia(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Wikipedia(format!("wikipedia HTTP {status}")));
        }

        let parsed: WikipediaSearch =
            resp.json().await.map_err(|e| Error::Wikipedia(e.to_string()))?;
        tracing::debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            has_query = parsed.query.is_some(),
            "wikipedia search completed"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};

    async fn fixture(
        body: serde_json::Value,
    ) -> std::net::SocketAddr {
        let app = Router::new().route("/w/api.php", get(move || async move { axum::Json(body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn decodes_success_shape() {
        let addr = fixture(serde_json::json!({
            "query": {
                "search": [
                    {"title": "Driving", "snippet": "the operation of a vehicle", "pageid": 8_758}
                ],
                "searchinfo": {"suggestion": "driving test"}
            }
        }))
        .await;

        let config = WikipediaConfig {
            endpoint: format!("http://{addr}/w/api.php"),
            ..WikipediaConfig::default()
        };
        let client = WikipediaClient::new(reqwest::Client::new(), config);
        let parsed = client.search("driving").await.unwrap();
        let q = parsed.query.unwrap();
        assert_eq!(q.search.len(), 1);
        assert_eq!(q.search[0].title, "Driving");
        assert_eq!(q.searchinfo.suggestion.as_deref(), Some("driving test"));
    }

    #[tokio::test]
    async fn upstream_error_payload_decodes_without_query() {
        let addr = fixture(serde_json::json!({
            "error": {"code": "maxlag", "info": "server busy"}
        }))
        .await;

        let config = WikipediaConfig {
            endpoint: format!("http://{addr}/w/api.php"),
            ..WikipediaConfig::default()
        };
        let client = WikipediaClient::new(reqwest::Client::new(), config);
        let parsed = client.search("driving").await.unwrap();
        assert!(parsed.query.is_none());
    }

    #[tokio::test]
    async fn transport_failure_is_a_wikipedia_error() {
        let config = WikipediaConfig {
            endpoint: "http://127.0.0.1:9/w/api.php".to_string(),
            timeout_ms: 1_000,
        };
        let client = WikipediaClient::new(reqwest::Client::new(), config);
        let err = client.search("driving").await.unwrap_err();
        assert!(matches!(err, Error::Wikipedia(_)));
    }
}
