#![allow(dead_code)]

use bfhl_service::config::BfhlConfig;
use bfhl_service::services::providers::TextProvider;
use bfhl_service::services::Dispatcher;
use bfhl_service::startup::{build_router, AppState, Application};
use service_core::axum::Router;
use std::sync::Arc;

pub const TEST_EMAIL: &str = "ops@example.com";

/// Router wired to the given AI collaborator, for `oneshot` tests.
pub fn router_with(text_provider: Option<Arc<dyn TextProvider>>) -> Router {
    let config = BfhlConfig::for_tests(TEST_EMAIL);
    build_router(AppState {
        dispatcher: Dispatcher::new(text_provider)
            .with_max_fibonacci_terms(config.max_fibonacci_terms),
        config: Arc::new(config),
    })
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(text_provider: Option<Arc<dyn TextProvider>>) -> Self {
        let app = Application::build_with_provider(BfhlConfig::for_tests(TEST_EMAIL), text_provider)
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
}
