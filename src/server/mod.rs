//! Web endpoint: chat page, query submission and session housekeeping.

pub mod error;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent_loop::AgentLoop;
use crate::config::AlfredConfig;
use crate::error::AlfredError;
use crate::session::SessionStore;
use crate::uploads::{UploadStore, DEFAULT_MAX_AGE, MAX_UPLOAD_BYTES};

pub use error::ApiError;

/// Request bodies above this are refused before the handler runs.
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 2 * 1024 * 1024;

/// State shared across handlers.
pub struct AppState {
    pub agent: AgentLoop,
    pub sessions: SessionStore,
    pub uploads: UploadStore,
    pub index_html: PathBuf,
    pub upload_max_age: Duration,
}

impl AppState {
    pub fn new(agent: AgentLoop, uploads: UploadStore) -> Self {
        Self {
            agent,
            sessions: SessionStore::new(),
            uploads,
            index_html: PathBuf::from("index.html"),
            upload_max_age: DEFAULT_MAX_AGE,
        }
    }

    pub fn from_config(config: &AlfredConfig) -> Result<Self, AlfredError> {
        let agent = AgentLoop::from_config(config)?;
        Ok(Self::new(agent, UploadStore::new(&config.upload_dir))
            .with_index_html(&config.index_html)
            .with_upload_max_age(config.upload_max_age))
    }

    pub fn with_index_html(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_html = path.into();
        self
    }

    pub fn with_upload_max_age(mut self, max_age: Duration) -> Self {
        self.upload_max_age = max_age;
        self
    }
}

/// Build the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/query", post(routes::query))
        .route("/clear_csv", post(routes::clear_csv))
        .route("/clear_session", post(routes::clear_session))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

/// Bind `config.bind` and serve until the process stops.
pub async fn serve(config: &AlfredConfig) -> Result<(), AlfredError> {
    let state = AppState::from_config(config)?;
    state.uploads.ensure_dir().await?;

    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
