use crate::config::db::DB;
use crate::config::storage::create_object_store;
use crate::config::AppConfig;
use crate::errors::{any_error, ApiError};
use crate::route::{blog_api, upload_api};
use crate::service::upload_service::UploadService;
use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::Router;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod config;
pub mod errors;
pub mod model;
pub mod route;
pub mod service;
pub mod util;

// Application state shared across handlers.
// Cloning AppState is cheap, the database pool and the storage client sit behind Arc.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DB>,
    pub uploader: Arc<UploadService>,
}

impl AppState {
    /// Connects to the database and builds the storage client described by `config`.
    pub async fn new(config: AppConfig) -> Result<Self> {
        let db = DB::new(
            &config.db.url,
            config.db.pool_size,
            Duration::from_secs(config.db.acquire_timeout_secs),
        )
        .await?;

        let store = create_object_store(&config.storage)?;

        Ok(Self::from_parts(config, db, store))
    }

    /// Assembles the state from already constructed dependencies.
    pub fn from_parts(config: AppConfig, db: DB, store: Arc<dyn ObjectStore>) -> Self {
        let uploader = UploadService::new(store, config.storage.clone());

        AppState {
            config: Arc::new(config),
            db: Arc::new(db),
            uploader: Arc::new(uploader),
        }
    }
}

// Application router creation
// Note: The order of layers is important.
// https://docs.rs/axum/latest/axum/middleware/index.html#ordering
pub fn create_app(state: AppState) -> Router {
    let config = &state.config;

    let static_route = Router::new()
        .route_service(
            "/",
            ServeFile::new(Path::new(&config.static_path).join("index.html")),
        )
        .nest_service(
            &config.static_url,
            ServeDir::new(&config.static_path).not_found_service(handle_404.into_service()),
        );

    let mut app = Router::new()
        .nest("/api", blog_api::create_routes())
        .merge(upload_api::create_routes())
        .merge(static_route)
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TimeoutLayer::new(Duration::from_secs(config.http.request_timeout_secs)))
                .layer(DefaultBodyLimit::max(config.http.max_body_size as usize))
                .layer(config.http.cors.clone().into_layer()),
        );

    if config.log.log_requests {
        app = app.layer(TraceLayer::new_for_http());
    }
    app.with_state(state)
}

pub async fn handle_404(_uri: Uri) -> ApiError {
    any_error(404, "Not Found", None)
}

async fn handle_405() -> ApiError {
    any_error(405, "Method Not Allowed", None)
}

// Custom panic handler, logs the panic and returns a 500 response
fn handle_panic(panic: Box<dyn std::any::Any + Send>) -> Response {
    let panic_message = if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Unknown panic"
    };

    error!("App panicked: {}", panic_message);
    any_error(500, "Internal Server Error", None).into_response()
}
