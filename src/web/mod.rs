//! Web form front end.
//!
//! One page with an image URL field. Submitting it runs the shared image
//! analysis and renders the answer together with the image.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::analysis::ImageAnalyzer;
use crate::error::{InsightError, Result};

pub use routes::AnalyzeForm;

/// State shared by the handlers.
///
/// `analyzer` holds the startup configuration error when analysis could not be
/// set up; the form then answers every submission with that message.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: std::result::Result<Arc<dyn ImageAnalyzer>, String>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self {
            analyzer: Ok(analyzer),
        }
    }

    /// State whose analysis is disabled for `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            analyzer: Err(reason.into()),
        }
    }

    /// State from the outcome of setting up the analyzer at startup.
    ///
    /// Configuration errors keep their bare message so the banner reads like
    /// the CLI's error; other errors are shown as displayed.
    pub fn from_startup(analyzer: Result<Arc<dyn ImageAnalyzer>>) -> Self {
        match analyzer {
            Ok(analyzer) => Self::new(analyzer),
            Err(InsightError::ConfigurationError(message)) => Self::unavailable(message),
            Err(e) => Self::unavailable(e.to_string()),
        }
    }
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/analyze", post(routes::analyze))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server until the process stops.
pub async fn run_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web form listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
