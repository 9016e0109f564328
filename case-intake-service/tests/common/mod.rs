use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use case_intake_service::config::CaseIntakeConfig;
use case_intake_service::services::InMemoryCaseStore;
use case_intake_service::startup::{build_router, AppState, Application};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const SAVE_CASE_PATH: &str = "/api/save-case";

/// Router wired to `store`; clones of the store observe the same state.
pub fn in_memory_app(store: InMemoryCaseStore) -> Router {
    build_router(AppState::new(Arc::new(store)))
}

pub async fn post_case(app: &Router, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(SAVE_CASE_PATH)
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse JSON")
    };

    (status, body)
}

pub fn test_config(mongo_uri: &str, database: &str) -> CaseIntakeConfig {
    let common = CoreConfig {
        port: 0, // Random port for testing
        log_level: "info".to_string(),
        otlp_endpoint: None,
    };

    let mut config = CaseIntakeConfig::from_lookup(common, |key| {
        (key == "MONGO_URI").then(|| mongo_uri.to_string())
    })
    .expect("Failed to build configuration");
    config.mongodb.database = database.to_string();
    config
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(config: CaseIntakeConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub async fn save_case(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}{}", self.address, SAVE_CASE_PATH))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
