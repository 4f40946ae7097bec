//! Per-request evidence aggregation across the enabled sources.
//!
//! Calls run strictly sequentially and every failure degrades to an empty
//! sub-result; `combine` always hands back a composite.

use askpipe_core::{
    Aggregate, EncyclopediaProvider, SearchProvider, WikipediaEvidence,
};

pub struct Aggregator {
    primary: Box<dyn SearchProvider>,
    fallback: Box<dyn SearchProvider>,
    encyclopedia: Box<dyn EncyclopediaProvider>,
}

impl Aggregator {
    pub fn new(
        primary: Box<dyn SearchProvider>,
        fallback: Box<dyn SearchProvider>,
        encyclopedia: Box<dyn EncyclopediaProvider>,
    ) -> Self {
        Self {
            primary,
            fallback,
            encyclopedia,
        }
    }

    /// Build the composite for one query. The fallback provider runs only
    /// when the primary yields nothing, so at most one of `google` and
    /// `fallback` ends up non-empty.
    pub async fn combine(&self, query: &str, use_web: bool, use_wiki: bool) -> Aggregate {
        let mut combined = Aggregate::empty(query);

        if use_web {
            let primary_results = match self.primary.search(query).await {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!(provider = self.primary.name(), error = %e, "primary search failed");
                    Vec::new()
                }
            };
            if primary_results.is_empty() {
                tracing::warn!(
                    provider = self.fallback.name(),
                    "primary search yielded nothing, using fallback"
                );
                combined.sources.fallback = match self.fallback.search(query).await {
                    Ok(results) => results,
                    Err(e) => {
                        tracing::warn!(provider = self.fallback.name(), error = %e, "fallback search failed");
                        Vec::new()
                    }
                };
            } else {
                combined.sources.google = primary_results;
            }
        }

        if use_wiki {
            match self.encyclopedia.search(query).await {
                Ok(resp) => {
                    if let Some(q) = resp.query {
                        combined.sources.wikipedia = WikipediaEvidence {
                            results: q.search,
                            suggestion: q.searchinfo.suggestion,
                        };
                    } else {
                        // Degrade silently; the composite keeps an empty mapping.
                        tracing::warn!("wikipedia response carried no query section");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "wikipedia search failed");
                }
            }
        }

        combined
    }
}
