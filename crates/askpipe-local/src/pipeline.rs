//! Top-level orchestration: aggregate evidence, then synthesize an answer.

use crate::aggregate::Aggregator;
use crate::answer::Synthesizer;

pub struct Pipeline {
    aggregator: Aggregator,
    synthesizer: Synthesizer,
}

impl Pipeline {
    pub fn new(aggregator: Aggregator, synthesizer: Synthesizer) -> Self {
        Self {
            aggregator,
            synthesizer,
        }
    }

    /// Run one query end to end. Always returns `(answer, evidence_json)`;
    /// the caller never sees a raw failure, worst case is an explanatory
    /// string plus a JSON error object.
    pub async fn run(&self, query: &str, use_web: bool, use_wiki: bool) -> (String, String) {
        tracing::info!(query, use_web, use_wiki, "pipeline started");

        let aggregate = self.aggregator.combine(query, use_web, use_wiki).await;
        let evidence = match serde_json::to_string_pretty(&aggregate) {
            Ok(js) => js,
            Err(e) => {
                tracing::error!(error = %e, "evidence serialization failed");
                let msg = e.to_string();
                return (
                    format!("Pipeline error: {msg}"),
                    serde_json::json!({ "error": msg }).to_string(),
                );
            }
        };

        let answer = self.synthesizer.answer(&aggregate).await;
        tracing::info!("pipeline completed");
        (answer, evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::NO_RESULTS_MESSAGE;
    use askpipe_core::{
        Aggregate, ChatModel, EncyclopediaProvider, Error, Result, SearchProvider, SearchResult,
        Source, WikipediaSearch,
    };

    struct FailingSearch;

    #[async_trait::async_trait]
    impl SearchProvider for FailingSearch {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>> {
            Err(Error::Search("network down".to_string()))
        }
    }

    struct FixedSearch(Vec<SearchResult>);

    #[async_trait::async_trait]
    impl SearchProvider for FixedSearch {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>> {
            Ok(self.0.clone())
        }
    }

    struct FailingWiki;

    #[async_trait::async_trait]
    impl EncyclopediaProvider for FailingWiki {
        async fn search(&self, _query: &str) -> Result<WikipediaSearch> {
            Err(Error::Wikipedia("network down".to_string()))
        }
    }

    struct EchoModel;

    #[async_trait::async_trait]
    impl ChatModel for EchoModel {
        async fn chat(&self, _prompt: &str) -> Result<String> {
            Ok("a synthesized answer".to_string())
        }
    }

    fn pipeline(primary: Box<dyn SearchProvider>) -> Pipeline {
        Pipeline::new(
            Aggregator::new(primary, Box::new(FailingSearch), Box::new(FailingWiki)),
            Synthesizer::new(Box::new(EchoModel)),
        )
    }

    #[tokio::test]
    async fn returns_answer_and_valid_json_even_when_every_call_fails() {
        let p = pipeline(Box::new(FailingSearch));
        let (answer, evidence) = p.run("anything", true, true).await;
        assert_eq!(answer, NO_RESULTS_MESSAGE);

        let parsed: Aggregate = serde_json::from_str(&evidence).unwrap();
        assert_eq!(parsed.query, "anything");
        assert!(parsed.sources.is_empty());
    }

    #[tokio::test]
    async fn disabled_toggles_yield_empty_evidence_and_fixed_message() {
        let p = pipeline(Box::new(FixedSearch(vec![SearchResult {
            title: "t".to_string(),
            url: "https://example.com".to_string(),
            snippet: String::new(),
            source: Source::Google,
        }])));
        let (answer, evidence) = p.run("anything", false, false).await;
        assert_eq!(answer, NO_RESULTS_MESSAGE);

        let parsed: Aggregate = serde_json::from_str(&evidence).unwrap();
        assert!(parsed.sources.google.is_empty());
        assert!(parsed.sources.wikipedia.is_empty());
        assert!(parsed.sources.fallback.is_empty());
    }

    #[tokio::test]
    async fn evidence_json_round_trips_to_the_aggregated_structure() {
        let results = vec![SearchResult {
            title: "Driving".to_string(),
            url: "https://example.com/driving".to_string(),
            snippet: "Mirrors first.".to_string(),
            source: Source::Google,
        }];
        let p = pipeline(Box::new(FixedSearch(results.clone())));
        let (answer, evidence) = p.run("driving", true, false).await;
        assert_eq!(answer, "a synthesized answer");

        let parsed: Aggregate = serde_json::from_str(&evidence).unwrap();
        assert_eq!(parsed.sources.google, results);
        assert!(parsed.sources.fallback.is_empty());
        assert!(parsed.sources.wikipedia.is_empty());
    }
}
