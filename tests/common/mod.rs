use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use catalog_api::{
    config::AppConfig,
    db,
    services::{catalog::CatalogService, currency::CurrencyClient},
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A sell-rate endpoint that refuses connections, for tests that never
/// reach the currency client.
const UNREACHABLE_RATE_URL: &str = "http://127.0.0.1:9";

/// Helper harness for spinning up an application state backed by a
/// throwaway SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    #[allow(dead_code)]
    pub async fn new() -> Self {
        Self::with_exchange_rate_url(UNREACHABLE_RATE_URL).await
    }

    /// Construct a test application whose currency client talks to the
    /// given base URL instead of the real rate provider.
    pub async fn with_exchange_rate_url(rate_url: &str) -> Self {
        let db_dir = TempDir::new().expect("failed to create temp dir for test database");
        let db_file = db_dir.path().join("catalog_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_file.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single connection keeps SQLite file access serialized in tests.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::reset_schema(&pool)
            .await
            .expect("failed to reset schema in tests");

        let db_arc = Arc::new(pool);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build test http client");
        let currency = Arc::new(CurrencyClient::with_client(
            rate_url.to_string(),
            http_client,
        ));
        let catalog = Arc::new(CatalogService::new(db_arc.clone(), currency));

        let state = AppState {
            db: db_arc,
            config: cfg,
            catalog,
        };

        let router = catalog_api::routes().with_state(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Send a request against the router, optionally with a JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

/// Decode a response into its status and JSON body.
pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not valid JSON")
    };
    (status, value)
}
