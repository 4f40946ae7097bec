use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use askpipe_local::pipeline::Pipeline;

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Debug, Deserialize)]
struct AskRequest {
    query: String,
    #[serde(default = "default_true")]
    use_web: bool,
    #[serde(default = "default_true")]
    use_wiki: bool,
}

fn default_true() -> bool {
    true
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn ask(
    State(pipeline): State<Arc<Pipeline>>,
    Json(req): Json<AskRequest>,
) -> Json<serde_json::Value> {
    let (answer, evidence) = pipeline.run(&req.query, req.use_web, req.use_wiki).await;
    let evidence: serde_json::Value = serde_json::from_str(&evidence)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));
    Json(serde_json::json!({ "answer": answer, "evidence": evidence }))
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/ask", post(ask))
        .with_state(pipeline)
}

pub async fn run(port: u16) -> Result<()> {
    let pipeline = Arc::new(askpipe_local::pipeline_from_env()?);
    let app = router(pipeline);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving web front end");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_app() -> std::net::SocketAddr {
        let pipeline = Arc::new(askpipe_local::pipeline_from_env().unwrap());
        let app = router(pipeline);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn index_serves_the_form() {
        let addr = spawn_app().await;
        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Smart Search Assistant"));
        assert!(body.contains("use_web"));
        assert!(body.contains("use_wiki"));
    }

    #[tokio::test]
    async fn ask_with_both_toggles_off_returns_structured_pair() {
        // No sources enabled means no outbound call is made, so this test
        // exercises the full request path offline.
        let addr = spawn_app().await;
        let client = reqwest::Client::new();
        let resp: serde_json::Value = client
            .post(format!("http://{addr}/api/ask"))
            .json(&serde_json::json!({
                "query": "how to learn car driving",
                "use_web": false,
                "use_wiki": false
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(resp["answer"]
            .as_str()
            .unwrap()
            .starts_with("No search results found"));
        assert_eq!(resp["evidence"]["query"], "how to learn car driving");
        assert_eq!(resp["evidence"]["sources"]["wikipedia"], serde_json::json!({}));
        assert_eq!(
            resp["evidence"]["sources"]["google"],
            serde_json::json!([])
        );
        assert_eq!(
            resp["evidence"]["sources"]["fallback"],
            serde_json::json!([])
        );
    }
}
