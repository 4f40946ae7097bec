use std::time::Duration;

use askpipe_core::{Error, Result};

pub mod aggregate;
pub mod answer;
pub mod duckduckgo;
pub mod google;
pub mod ollama;
pub mod pipeline;
pub mod wikipedia;

pub(crate) fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Build the shared HTTP client used by every outbound call.
///
/// Safety defaults: avoid hanging forever on DNS/TLS/body stalls. Per-call
/// timeouts in the client configs can still tighten this.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("askpipe/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| Error::Search(e.to_string()))
}

/// Wire a ready-to-run pipeline from environment configuration.
///
/// Primary web search is the Google scraper, fallback is the DuckDuckGo
/// instant-answer API, synthesis goes through the local Ollama endpoint.
pub fn pipeline_from_env() -> Result<pipeline::Pipeline> {
    let client = build_client()?;
    let aggregator = aggregate::Aggregator::new(
        Box::new(google::GoogleScrapeProvider::new(
            client.clone(),
            google::GoogleConfig::from_env(),
        )),
        Box::new(duckduckgo::DuckDuckGoProvider::new(
            client.clone(),
            duckduckgo::DuckDuckGoConfig::from_env(),
        )),
        Box::new(wikipedia::WikipediaClient::new(
            client.clone(),
            wikipedia::WikipediaConfig::from_env(),
        )),
    );
    let synthesizer = answer::Synthesizer::new(Box::new(ollama::OllamaClient::new(
        client,
        ollama::OllamaConfig::from_env(),
    )));
    Ok(pipeline::Pipeline::new(aggregator, synthesizer))
}
