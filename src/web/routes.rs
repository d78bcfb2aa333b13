//! Route handlers for the web form.

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::backend::media::ImageReference;
use crate::web::AppState;

pub(crate) const EMPTY_URL_MESSAGE: &str = "Please enter a valid image URL.";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    image_url: String,
    error: Option<String>,
    result: Option<String>,
    image_src: Option<String>,
}

impl IndexTemplate {
    fn blank() -> Self {
        Self {
            image_url: String::new(),
            error: None,
            result: None,
            image_src: None,
        }
    }
}

/// Submitted form fields.
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub image_url: String,
}

fn render(status: StatusCode, page: IndexTemplate) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

fn error_page(status: StatusCode, image_url: &str, message: String) -> Response {
    render(
        status,
        IndexTemplate {
            image_url: image_url.to_string(),
            error: Some(message),
            ..IndexTemplate::blank()
        },
    )
}

/// GET / - the empty form.
pub async fn index() -> Response {
    render(StatusCode::OK, IndexTemplate::blank())
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// POST /analyze - validate the input, run the analysis, render the answer.
pub async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let image_url = form.image_url.trim();

    let image = ImageReference::parse(image_url);
    // Local paths are a CLI feature; the server never reads its own files
    if image_url.is_empty() || !image.is_url() {
        warn!(input = image_url, "Rejected image URL");
        return error_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            image_url,
            EMPTY_URL_MESSAGE.to_string(),
        );
    }

    let analyzer = match &state.analyzer {
        Ok(analyzer) => analyzer,
        Err(reason) => {
            warn!(reason = %reason, "Analysis requested while unavailable");
            return error_page(StatusCode::SERVICE_UNAVAILABLE, image_url, reason.clone());
        }
    };

    info!(image = %image, "Analyzing image from web form");

    match analyzer.analyze(&image).await {
        Ok(output) => render(
            StatusCode::OK,
            IndexTemplate {
                image_url: image_url.to_string(),
                error: None,
                result: Some(output.raw),
                image_src: Some(image_url.to_string()),
            },
        ),
        Err(e) => {
            error!(error = %e, "Image analysis failed");
            let status = if e.is_local() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            error_page(status, image_url, e.to_string())
        }
    }
}
