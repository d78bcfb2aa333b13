use reqwest::Response;
use tracing::error;

use crate::error::{ApiErrorKind, InsightError, Result};

/// Convert a reqwest error to an InsightError, handling timeout errors specially.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> InsightError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        InsightError::Timeout
    } else {
        InsightError::HttpError(e)
    }
}

/// Check HTTP response status and classify the error body if unsuccessful.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(InsightError::api_error(
            provider_name,
            ApiErrorKind::from_status(status.as_u16(), error_text),
        ));
    }
    Ok(response)
}

/// Macro to generate the standard builder methods of a completion client.
///
/// `config` is the field path to the client's [`ClientConfig`](crate::ClientConfig),
/// so wrappers can expose the same builder surface as the client they hold.
#[macro_export]
macro_rules! impl_client_builder_methods {
    (
        client_type: $client:ty,
        config: $($field:ident).+
    ) => {
        impl $client {
            /// Set the model identifier (provider prefixes such as `gemini/` are allowed)
            #[tracing::instrument(skip(self, model))]
            pub fn model(mut self, model: impl Into<String>) -> Self {
                let model = model.into();
                tracing::debug!(
                    previous_model = %self.$($field).+.model,
                    new_model = %model,
                    "Setting model"
                );
                self.$($field).+.model = model;
                self
            }

            /// Set the temperature (0.0 to 1.0, lower = more deterministic)
            #[tracing::instrument(skip(self))]
            pub fn temperature(mut self, temp: f32) -> Self {
                tracing::debug!(
                    previous_temp = ?self.$($field).+.temperature,
                    new_temp = temp,
                    "Setting temperature"
                );
                self.$($field).+.temperature = Some(temp);
                self
            }

            /// Set the maximum tokens to generate
            #[tracing::instrument(skip(self))]
            pub fn max_tokens(mut self, max: u32) -> Self {
                tracing::debug!(
                    previous_max = ?self.$($field).+.max_tokens,
                    new_max = max,
                    "Setting max_tokens"
                );
                // Ensure max_tokens is at least 1 to avoid API errors
                self.$($field).+.max_tokens = Some(max.max(1));
                self
            }

            /// Set a timeout for each HTTP request. There is none by default.
            #[tracing::instrument(skip(self))]
            pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
                tracing::debug!(
                    previous_timeout = ?self.$($field).+.timeout,
                    new_timeout = ?timeout,
                    "Setting timeout"
                );
                self.$($field).+.timeout = Some(timeout);
                self
            }

            /// Add a provider-specific option to every request body
            #[tracing::instrument(skip(self, value))]
            pub fn option(mut self, key: &str, value: serde_json::Value) -> Self {
                tracing::debug!(key, "Setting provider option");
                self.$($field).+.options.insert(key.to_string(), value);
                self
            }
        }
    };
}
