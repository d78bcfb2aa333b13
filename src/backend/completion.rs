use async_trait::async_trait;
use tracing::{debug, error, instrument};

use crate::backend::openai_compatible::{CompletionParams, CompletionResponse};
use crate::backend::utils::{check_response_status, handle_http_error};
use crate::config::DEFAULT_BASE_URL;
use crate::error::{ApiErrorKind, InsightError, Result};

/// A generic chat-completion capability.
///
/// The clients never talk HTTP themselves; they hand a fully built
/// [`CompletionParams`] to a backend and read back the response. Errors are
/// returned as they come, without retry.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Name used in logs and error messages
    fn provider_name(&self) -> &str;

    async fn complete(&self, params: &CompletionParams) -> Result<CompletionResponse>;
}

/// Backend for OpenAI-compatible `/chat/completions` endpoints.
///
/// Defaults to Gemini's OpenAI-compatible endpoint. The credential is sent as a
/// bearer token.
#[derive(Debug, Clone)]
pub struct HttpCompletionBackend {
    base_url: String,
    provider_name: String,
    client: reqwest::Client,
}

impl Default for HttpCompletionBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpCompletionBackend {
    /// Create a backend for the given base URL (without the `/chat/completions` suffix).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let provider_name = if base_url.contains("generativelanguage.googleapis.com") {
            "Gemini".to_string()
        } else {
            "OpenAI-compatible".to_string()
        };
        Self {
            base_url,
            provider_name,
            client: reqwest::Client::new(),
        }
    }

    /// Override the provider name used in errors and logs.
    pub fn provider(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    #[instrument(
        name = "http_completion",
        skip(self, params),
        fields(
            provider = %self.provider_name,
            model = %params.model,
            messages = params.messages.len()
        )
    )]
    async fn complete(&self, params: &CompletionParams) -> Result<CompletionResponse> {
        if params.api_key.is_empty() {
            return Err(InsightError::api_error(
                &self.provider_name,
                ApiErrorKind::AuthenticationFailed,
            ));
        }

        let url = self.endpoint();
        debug!(url = %url, "Sending chat completion request");

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&params.api_key)
            .json(params);
        if let Some(timeout) = params.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| handle_http_error(e, &self.provider_name))?;
        let response = check_response_status(response, &self.provider_name).await?;

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse chat completion response");
            InsightError::api_error(
                &self.provider_name,
                ApiErrorKind::UnexpectedResponse {
                    details: e.to_string(),
                },
            )
        })?;

        debug!(
            choices = completion.choices.len(),
            "Received chat completion response"
        );
        Ok(completion)
    }
}
