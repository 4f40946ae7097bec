//! Answer synthesis: turn aggregated evidence into a natural-language answer.

use askpipe_core::{Aggregate, ChatModel};

pub const NO_RESULTS_MESSAGE: &str =
    "No search results found. Try rephrasing your question or check your network connection.";

pub struct Synthesizer {
    model: Box<dyn ChatModel>,
}

impl Synthesizer {
    pub fn new(model: Box<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Produce the user-facing answer. Never fails: an empty composite
    /// short-circuits to [`NO_RESULTS_MESSAGE`] without a model call, and a
    /// model failure comes back as a descriptive string.
    pub async fn answer(&self, aggregate: &Aggregate) -> String {
        if aggregate.sources.is_empty() {
            return NO_RESULTS_MESSAGE.to_string();
        }

        let prompt = build_prompt(aggregate);
        match self.model.chat(&prompt).await {
            Ok(text) => text,
            Err(e) => format!("Error generating answer: {e}"),
        }
    }
}

fn build_prompt(aggregate: &Aggregate) -> String {
    let context = serde_json::to_string_pretty(aggregate)
        .unwrap_or_else(|e| format!("(context serialization failed: {e})"));

    format!(
        "Analyze available information and answer:\n\
         Query: {query}\n\
         Available Context: {context}\n\
         \n\
         If information is conflicting:\n\
         - Prioritize official sources\n\
         - Note disagreements in the answer\n\
         - Maintain neutral tone\n\
         \n\
         Structure your answer with:\n\
         1. Key points\n\
         2. Step-by-step instructions (if applicable)\n\
         3. Common mistakes to avoid",
        query = aggregate.query,
    )
}
