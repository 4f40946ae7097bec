//! Local language-model chat via an Ollama-compatible endpoint.

use askpipe_core::{ChatModel, Error, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MODEL: &str = "deepseek-r1:14b";

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            // Local models can be slow to first token on cold start.
            timeout_ms: 300_000,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = crate::env("ASKPIPE_OLLAMA_BASE_URL") {
            cfg.base_url = v;
        }
        if let Some(v) = crate::env("ASKPIPE_OLLAMA_MODEL") {
            cfg.model = v;
        }
        cfg
    }
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(client: reqwest::Client, config: OllamaConfig) -> Self {
        Self { client, config }
    }

    fn endpoint_chat(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait::async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let req = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let resp = self
            .client
            .post(self.endpoint_chat())
            .timeout(std::time::Duration::from_millis(self.config.timeout_ms))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&req)
            .send()
            .await
            .map_err(|e| Error::Llm(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Llm(format!("ollama chat HTTP {status}")));
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| Error::Llm(e.to_string()))?;
        Ok(parsed.message.content)
    }
}
