use std::sync::Arc;

use ag_core::config::{FetchConfig, KeywordConfig, ServerConfig};
use ag_core::{GenerationModel, Result};
use ag_inference::models::DummyModel;
use ag_inference::KeywordExtractor;
use ag_scrappers::{Fetcher, PipelineManager};
use ag_storage::backends::JsonFileStorage;
use ag_web::{create_app, AppState};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::Notify;
use tower::util::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    dir: TempDir,
}

fn app_with(model: Arc<dyn GenerationModel>, max_concurrent: usize) -> TestApp {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("static")).unwrap();
    std::fs::write(
        dir.path().join("static").join("index.html"),
        "<html><body>generator</body></html>",
    )
    .unwrap();

    let storage = Arc::new(JsonFileStorage::with_path(dir.path().join("history.json"), 100));
    let pipeline = PipelineManager::new(
        Fetcher::new(&FetchConfig::default()).unwrap(),
        KeywordExtractor::new(&KeywordConfig::default()),
        model,
        storage,
    );
    let server = ServerConfig {
        static_dir: dir.path().join("static"),
        max_concurrent_generations: max_concurrent,
        ..ServerConfig::default()
    };

    TestApp {
        router: create_app(AppState::new(pipeline, server)),
        dir,
    }
}

fn app() -> TestApp {
    app_with(Arc::new(DummyModel::new()), 4)
}

async fn article_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><main><p>server server cluster cluster node</p></main></body></html>",
        ))
        .mount(&server)
        .await;
    server
}

fn generate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/generate_content")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn generate_persists_and_returns_result() {
    let server = article_server().await;
    let test = app();
    let url = format!("{}/post", server.uri());

    let response = test
        .router
        .clone()
        .oneshot(generate_request(&serde_json::json!({ "url": url }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["url"], url);
    assert_eq!(body["keywords"][0], "server");
    assert_eq!(body["keywords"][1], "cluster");
    assert!(body["generated_content"].as_str().unwrap().contains("server"));
    assert!(body["timestamp"].is_string());

    let response = test.router.clone().oneshot(get("/api/history")).await.unwrap();
    let history = json_body(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["metadata"]["keyword_count"], 3);
    assert!(test.dir.path().join("history.json").exists());
}

#[tokio::test]
async fn missing_url_is_bad_request() {
    for body in [r#"{}"#, r#"{"url": "  "}"#, "not json"] {
        let response = app().router.oneshot(generate_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "URL is required");
    }
}

#[tokio::test]
async fn invalid_url_is_bad_request() {
    let response = app()
        .router
        .oneshot(generate_request(r#"{"url": "not a url"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid URL format");
}

#[tokio::test]
async fn page_without_content_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<script>x()</script>"))
        .mount(&server)
        .await;

    let body = serde_json::json!({ "url": server.uri() }).to_string();
    let response = app().router.oneshot(generate_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No content found at URL");
}

struct FailingModel;

#[async_trait]
impl GenerationModel for FailingModel {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(ag_core::Error::GenerationFailed("service unavailable".to_string()))
    }
}

#[tokio::test]
async fn generation_failure_is_server_error() {
    let server = article_server().await;
    let test = app_with(Arc::new(FailingModel), 4);

    let body = serde_json::json!({ "url": server.uri() }).to_string();
    let response = test.router.clone().oneshot(generate_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Failed to generate content");

    let history = json_body(test.router.oneshot(get("/api/history")).await.unwrap()).await;
    assert!(history.as_array().unwrap().is_empty());
}

/// Blocks inside `generate` until released.
struct GateModel {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl GenerationModel for GateModel {
    fn name(&self) -> &str {
        "Gate"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("released".to_string())
    }
}

#[tokio::test]
async fn saturated_generation_route_is_rate_limited() {
    let server = article_server().await;
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let model = GateModel {
        entered: entered.clone(),
        release: release.clone(),
    };
    let test = app_with(Arc::new(model), 1);
    let body = serde_json::json!({ "url": server.uri() }).to_string();

    let first = tokio::spawn(test.router.clone().oneshot(generate_request(&body)));
    entered.notified().await;

    let second = test.router.clone().oneshot(generate_request(&body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json_body(second).await["error"], "Rate limit exceeded");

    release.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status(), StatusCode::OK);
}

#[tokio::test]
async fn history_negotiates_html() {
    let test = app();

    let response = test.router.clone().oneshot(get("/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!([]));

    let request = Request::builder()
        .uri("/history")
        .header(header::ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let response = test.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Content History"));
}

#[tokio::test]
async fn analytics_of_empty_history() {
    let response = app().router.oneshot(get("/api/analytics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_generations"], 0);
    assert_eq!(body["average_word_count"], 0.0);
    assert_eq!(body["timeline"], serde_json::json!([]));
}

#[tokio::test]
async fn index_is_served_from_static_dir() {
    let response = app().router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("generator"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = app().router.oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Resource not found");
}
