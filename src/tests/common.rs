use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use blogo::config::db::DB;
use blogo::config::{
    AppConfig, CORSConfig, DBConfig, HTTPConfig, LogConfig, StorageBackend, StorageConfig,
};
use blogo::{create_app, AppState};
use object_store::memory::InMemory;
use object_store::ObjectStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_BUCKET: &str = "blogo-test.appspot.com";

pub fn test_config() -> AppConfig {
    AppConfig {
        app_name: "Blogo".to_string(),
        static_url: "/static".to_string(),
        static_path: "./www".to_string(),
        http: HTTPConfig {
            ip: "127.0.0.1".to_string(),
            port: 0,
            max_body_size: 1024 * 1024,
            request_timeout_secs: 10,
            cors: CORSConfig {
                allowed_origins: vec![],
                allowed_methods: vec!["GET".to_string(), "POST".to_string()],
                allowed_headers: vec!["Content-Type".to_string()],
                allow_credentials: false,
                max_age: 60,
            },
        },
        db: DBConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            acquire_timeout_secs: 5,
            auto_migrate: true,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            bucket: TEST_BUCKET.to_string(),
            credentials_path: String::new(),
            local_path: String::new(),
            public_base_url: "https://firebasestorage.googleapis.com".to_string(),
            upload_prefix: "uploads".to_string(),
            timeout_secs: 5,
        },
        log: LogConfig { log_requests: false },
    }
}

/// A fresh in-memory database with the schema in place.
pub async fn test_db() -> DB {
    let db = DB::new("sqlite::memory:", 1, Duration::from_secs(5))
        .await
        .expect("Cannot open in-memory database");
    db.init_schema().await.expect("Cannot create schema");
    db
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemory>,
    pub router: Router,
}

pub async fn test_app() -> TestApp {
    let store = Arc::new(InMemory::new());
    let state = AppState::from_parts(
        test_config(),
        test_db().await,
        store.clone() as Arc<dyn ObjectStore>,
    );
    let router = create_app(state.clone());
    TestApp { state, store, router }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}
