//! HTTP API: router, shared state, handlers.

pub mod error;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::completion::Completion;
use crate::config::ServerConfig;
use crate::tasks::TaskFactory;

pub use error::{ApiError, ApiResult};

/// State shared across handlers. Immutable; cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// One completion client for the whole process.
    pub completion: Arc<dyn Completion>,
    /// Maximum request body size, in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self {
            completion,
            max_upload_size: ServerConfig::default().max_upload_size,
        }
    }

    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// A fresh factory bound to the shared client.
    pub fn factory(&self) -> TaskFactory {
        TaskFactory::new(Arc::clone(&self.completion))
    }
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/translate", post(handlers::translate))
        .route("/api/email", post(handlers::email))
        .route("/api/code-assist", post(handlers::code_assist))
        .route("/api/chat", post(handlers::chat))
        .route("/api/generate-title", post(handlers::generate_title))
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
