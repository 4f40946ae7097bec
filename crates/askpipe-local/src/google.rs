//! Primary web search: scrape a Google results page.
//!
//! Markup drift and anti-bot challenges are expected here, so the selector
//! sets and block-indicator phrases live in [`GoogleConfig`] as data rather
//! than hard-coded literals, and every per-block extraction failure skips
//! that block instead of aborting the page.

use askpipe_core::{Error, Result, SearchProvider, SearchResult, Source};
use rand::Rng;
use scraper::{Html, Selector};
use std::time::Instant;
use url::Url;

const DEFAULT_ENDPOINT: &str = "https://www.google.co.in/search";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub endpoint: String,
    /// Locale hints sent as `hl` / `gl` query params.
    pub language: String,
    pub country: String,
    /// Result count requested via the `num` query param.
    pub num_results: usize,
    /// Browser-like headers sent with every request.
    pub user_agent: String,
    pub accept_language: String,
    pub referer: String,
    /// Random pre-call delay range in milliseconds `(min, max)`. A politeness
    /// heuristic against bot detection; `(0, 0)` disables it.
    pub delay_ms: (u64, u64),
    pub timeout_ms: u64,
    /// Substrings that signal an anti-automation challenge. Any hit aborts
    /// parsing and yields an empty result list.
    pub block_indicators: Vec<String>,
    /// Candidate result-block selector (comma list tolerates markup drift).
    pub result_selector: String,
    pub title_selector: String,
    pub snippet_selector: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: "en".to_string(),
            country: "in".to_string(),
            num_results: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            referer: "https://www.google.com/".to_string(),
            delay_ms: (1_500, 3_000),
            timeout_ms: 10_000,
            block_indicators: vec![
                "CAPTCHA".to_string(),
                "unusual traffic".to_string(),
                "automated requests".to_string(),
            ],
            result_selector: "div.g, div[data-snf], div[data-header-feature]".to_string(),
            title_selector: "h3, [role=\"heading\"]".to_string(),
            snippet_selector: ".VwiC3b, .lyLwlc, .ITZIwc, .MUxGbd".to_string(),
        }
    }
}

impl GoogleConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = crate::env("ASKPIPE_GOOGLE_ENDPOINT") {
            cfg.endpoint = v;
        }
        if let Some(v) = crate::env("ASKPIPE_GOOGLE_DELAY_MIN_MS") {
            if let Ok(n) = v.parse() {
                cfg.delay_ms.0 = n;
            }
        }
        if let Some(v) = crate::env("ASKPIPE_GOOGLE_DELAY_MAX_MS") {
            if let Ok(n) = v.parse() {
                cfg.delay_ms.1 = n;
            }
        }
        cfg
    }
}

#[derive(Debug, Clone)]
pub struct GoogleScrapeProvider {
    client: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleScrapeProvider {
    pub fn new(client: reqwest::Client, config: GoogleConfig) -> Self {
        Self { client, config }
    }

    async fn jitter(&self) {
        let (min, max) = self.config.delay_ms;
        if max == 0 || min > max {
            return;
        }
        let ms = rand::thread_rng().gen_range(min..=max);
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

#[async_trait::async_trait]
impl SearchProvider for GoogleScrapeProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.jitter().await;
        let t0 = Instant::now();

        let num = self.config.num_results.to_string();
        let resp = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("q", query),
                ("hl", self.config.language.as_str()),
                ("gl", self.config.country.as_str()),
                ("num", num.as_str()),
            ])
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .header(
                reqwest::header::ACCEPT_LANGUAGE,
                &self.config.accept_language,
            )
            .header(reqwest::header::REFERER, &self.config.referer)
            .timeout(std::time::Duration::from_millis(self.config.timeout_ms))
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;

        let body = resp.text().await.map_err(|e| Error::Search(e.to_string()))?;

        if let Some(phrase) = self
            .config
            .block_indicators
            .iter()
            .find(|p| body.contains(p.as_str()))
        {
            tracing::warn!(%phrase, "google blocked the request");
            return Ok(Vec::new());
        }

        let results = parse_results_html(&body, &self.config)?;
        tracing::debug!(
            count = results.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "google search completed"
        );
        Ok(results)
    }
}

/// True when the href is an external destination rather than one of the
/// engine's own search/redirect paths.
fn is_external_destination(href: &str) -> bool {
    if href.starts_with("/search?") || href.starts_with("/url?") {
        return false;
    }
    if let Some(rest) = href.strip_prefix("//") {
        // Protocol-relative; treat like https.
        return Url::parse(&format!("https://{rest}")).is_ok();
    }
    matches!(Url::parse(href), Ok(u) if matches!(u.scheme(), "http" | "https"))
}

/// Parse a results page into normalized records, in document order.
///
/// Standalone so fixture HTML can exercise it without a network.
pub(crate) fn parse_results_html(html: &str, config: &GoogleConfig) -> Result<Vec<SearchResult>> {
    let result_sel = Selector::parse(&config.result_selector)
        .map_err(|e| Error::Search(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(&config.title_selector)
        .map_err(|e| Error::Search(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(&config.snippet_selector)
        .map_err(|e| Error::Search(format!("invalid snippet selector: {e:?}")))?;
    let link_sel =
        Selector::parse("a").map_err(|e| Error::Search(format!("invalid link selector: {e:?}")))?;

    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for block in document.select(&result_sel) {
        // Missing pieces are expected, not exceptional; skip the block.
        let title = match block.select(&title_sel).next() {
            Some(el) => el.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        if title.is_empty() {
            continue;
        }

        let href = match block
            .select(&link_sel)
            .find_map(|a| a.value().attr("href"))
        {
            Some(h) => h,
            None => continue,
        };
        if !is_external_destination(href) {
            continue;
        }

        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url: href.to_string(),
            snippet,
            source: Source::Google,
        });
    }

    Ok(results)
}
