use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("search failed: {0}")]
    Search(String),
    #[error("wikipedia failed: {0}")]
    Wikipedia(String),
    #[error("llm failed: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Where a web search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Google,
    Duckduckgo,
}

/// One normalized web search result. Immutable once created; duplicates
/// across sources are not merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source: Source,
}

/// One page entry from the encyclopedia search API. Unknown fields in the
/// upstream payload are dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikipediaPage {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub pageid: u64,
}

/// Typed success shape of the encyclopedia search API:
/// `{query: {search: [...], searchinfo: {suggestion?}}}`.
///
/// `query` is absent on some upstream error payloads; the aggregator treats
/// that the same as a transport failure.
#[derive(Debug, Clone, Deserialize)]
pub struct WikipediaSearch {
    pub query: Option<WikipediaQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WikipediaQuery {
    #[serde(default)]
    pub search: Vec<WikipediaPage>,
    #[serde(default)]
    pub searchinfo: WikipediaSearchInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WikipediaSearchInfo {
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Encyclopedia evidence as it appears in the composite. Serializes to `{}`
/// when empty so degraded responses round-trip as an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikipediaEvidence {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<WikipediaPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl WikipediaEvidence {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.suggestion.is_none()
    }
}

/// Per-source evidence lists.
///
/// Invariant: `google` and `fallback` are at most one non-empty at a time;
/// the fallback provider only runs when the primary yields nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceEvidence {
    #[serde(default)]
    pub google: Vec<SearchResult>,
    #[serde(default)]
    pub wikipedia: WikipediaEvidence,
    #[serde(default)]
    pub fallback: Vec<SearchResult>,
}

impl SourceEvidence {
    pub fn is_empty(&self) -> bool {
        self.google.is_empty() && self.wikipedia.is_empty() && self.fallback.is_empty()
    }
}

/// The per-request composite of all enabled sources' results. Built fresh
/// per request; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub query: String,
    pub sources: SourceEvidence,
}

impl Aggregate {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sources: SourceEvidence::default(),
        }
    }
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

#[async_trait::async_trait]
pub trait EncyclopediaProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<WikipediaSearch>;
}

#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, prompt: &str) -> Result<String>;
}
