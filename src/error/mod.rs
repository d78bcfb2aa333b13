use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Classification of a failed remote completion call.
///
/// The HTTP status of the provider response decides the kind; the provider's
/// error body is kept verbatim so callers can show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The credential was rejected (401/403), or no credential was supplied
    AuthenticationFailed,
    /// The provider throttled the request (429)
    RateLimited { details: String },
    /// The request was malformed or refused (4xx)
    BadRequest { details: String },
    /// The provider failed (5xx)
    ServerError { status: u16, details: String },
    /// The response did not have the expected shape
    UnexpectedResponse { details: String },
    /// Any other non-success status
    Other { status: u16, details: String },
}

impl ApiErrorKind {
    /// Classify a non-success HTTP status and its body.
    pub fn from_status(status: u16, details: impl Into<String>) -> Self {
        let details = details.into();
        match status {
            401 | 403 => ApiErrorKind::AuthenticationFailed,
            429 => ApiErrorKind::RateLimited { details },
            400..=499 => ApiErrorKind::BadRequest { details },
            500..=599 => ApiErrorKind::ServerError { status, details },
            _ => ApiErrorKind::Other { status, details },
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::AuthenticationFailed => write!(f, "authentication failed"),
            ApiErrorKind::RateLimited { details } => write!(f, "rate limited: {}", details),
            ApiErrorKind::BadRequest { details } => write!(f, "bad request: {}", details),
            ApiErrorKind::ServerError { status, details } => {
                write!(f, "server error ({}): {}", status, details)
            }
            ApiErrorKind::UnexpectedResponse { details } => {
                write!(f, "unexpected response: {}", details)
            }
            ApiErrorKind::Other { status, details } => {
                write!(f, "status {}: {}", status, details)
            }
        }
    }
}

/// Error types for image-insights.
///
/// Each variant is one category of failure. None of them is recovered from
/// inside the crate: the web form renders them as banners and the CLI lets them
/// end the process.
///
/// # Examples
///
/// ```
/// use image_insights::{InsightError, Result};
///
/// fn require_url(url: &str) -> Result<()> {
///     if url.trim().is_empty() {
///         return Err(InsightError::ValidationError("Please enter a valid image URL.".into()));
///     }
///     Ok(())
/// }
///
/// match require_url("") {
///     Err(InsightError::ValidationError(msg)) => println!("{}", msg),
///     other => println!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum InsightError {
    /// A required setting (the API credential) is missing or empty
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// User input was rejected before any remote call
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An image reference had a shape the adapter cannot turn into a content part
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    /// A local image file could not be read
    #[error("Failed to read image file {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote completion API answered with an error
    #[error("{provider} API error: {kind}")]
    ApiError {
        provider: String,
        kind: ApiErrorKind,
    },

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl InsightError {
    /// Shorthand for building an [`InsightError::ApiError`].
    pub fn api_error(provider: impl Into<String>, kind: ApiErrorKind) -> Self {
        InsightError::ApiError {
            provider: provider.into(),
            kind,
        }
    }

    /// True for failures that happened before anything was sent to the provider.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            InsightError::ConfigurationError(_)
                | InsightError::ValidationError(_)
                | InsightError::UnsupportedImageType(_)
                | InsightError::LocalIo { .. }
        )
    }
}

// HttpError, JsonError and LocalIo wrap errors without PartialEq and are never equal
impl PartialEq for InsightError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ConfigurationError(a), Self::ConfigurationError(b)) => a == b,
            (Self::ValidationError(a), Self::ValidationError(b)) => a == b,
            (Self::UnsupportedImageType(a), Self::UnsupportedImageType(b)) => a == b,
            (
                Self::ApiError {
                    provider: pa,
                    kind: ka,
                },
                Self::ApiError {
                    provider: pb,
                    kind: kb,
                },
            ) => pa == pb && ka == kb,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for image-insights operations.
pub type Result<T> = std::result::Result<T, InsightError>;
