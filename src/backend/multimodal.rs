use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::backend::adapter::prepare_multimodal_messages;
use crate::backend::client::{
    CallOptions, ChatClient, CompletionCallback, FunctionTable, LlmClient, report_usage,
};
use crate::backend::media::ImageReference;
use crate::backend::message::MessageInput;
use crate::backend::openai_compatible::CompletionParams;
use crate::config::Config;
use crate::error::Result;

/// Model-name markers of providers whose chat API accepts image parts.
pub const MULTIMODAL_MODEL_MARKERS: &[&str] = &["gemini", "google"];

/// Case-insensitive check of a model identifier against [`MULTIMODAL_MODEL_MARKERS`].
///
/// ```
/// use image_insights::supports_multimodal;
///
/// assert!(supports_multimodal("gemini/gemini-2.0-flash-exp"));
/// assert!(supports_multimodal("Google-Vision"));
/// assert!(!supports_multimodal("gpt-3.5-turbo"));
/// ```
pub fn supports_multimodal(model: &str) -> bool {
    let model = model.to_lowercase();
    MULTIMODAL_MODEL_MARKERS
        .iter()
        .any(|marker| model.contains(marker))
}

/// Image-aware wrapper around a [`ChatClient`].
///
/// Holds an optional default image that is attached to the last user message of
/// every completion it issues. Explicit images passed to [`LlmClient::call`] are
/// attached first, but only for models matching [`supports_multimodal`]; for
/// other models they are ignored.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> image_insights::Result<()> {
/// use image_insights::{CallOptions, ChatClient, ImageReference, LlmClient, MultimodalClient};
///
/// let client = MultimodalClient::new(ChatClient::new("your-gemini-api-key")?)
///     .with_default_image(ImageReference::parse("https://example.com/tower.jpg"));
///
/// let answer = client
///     .call("What is in this picture?".into(), CallOptions::default())
///     .await?;
/// println!("{}", answer);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MultimodalClient {
    inner: ChatClient,
    default_image: Option<ImageReference>,
}

impl MultimodalClient {
    pub fn new(inner: ChatClient) -> Self {
        Self {
            inner,
            default_image: None,
        }
    }

    /// Wrap a client built from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ChatClient::from_config(config)?))
    }

    /// Set the image attached to every completion issued by this client.
    pub fn with_default_image(mut self, image: ImageReference) -> Self {
        self.default_image = Some(image);
        self
    }

    pub fn default_image(&self) -> Option<&ImageReference> {
        self.default_image.as_ref()
    }

    pub fn inner(&self) -> &ChatClient {
        &self.inner
    }

    /// Complete `params` with the default image attached.
    ///
    /// Runs the messages through the adapter with the default image (if any),
    /// issues the call through the wrapped client and returns the first choice's
    /// content, empty when absent. Tool calls in the response are not dispatched
    /// here.
    #[instrument(
        name = "multimodal_non_streaming",
        skip_all,
        fields(model = %params.model, default_image = self.default_image.is_some())
    )]
    pub async fn handle_non_streaming_response(
        &self,
        mut params: CompletionParams,
        callbacks: &[Arc<dyn CompletionCallback>],
        _available_functions: Option<&FunctionTable>,
    ) -> Result<String> {
        let images = self.default_image.as_ref().map(std::slice::from_ref);
        let messages = std::mem::take(&mut params.messages);
        params.messages = prepare_multimodal_messages(messages, images).await?;

        let response = self.inner.complete(&params).await?;
        report_usage(&response, &params.model, callbacks);

        let content = response.first_content();
        debug!(content_len = content.len(), "Extracted first choice content");
        Ok(content)
    }
}

crate::impl_client_builder_methods! {
    client_type: MultimodalClient,
    config: inner.config
}

#[async_trait]
impl LlmClient for MultimodalClient {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    #[instrument(
        name = "multimodal_call",
        skip(self, messages, options),
        fields(
            model = %self.inner.config().model,
            images = options.images.as_ref().map_or(0, Vec::len)
        )
    )]
    async fn call(&self, messages: MessageInput, options: CallOptions) -> Result<String> {
        let CallOptions {
            tools,
            callbacks,
            available_functions,
            images,
        } = options;

        let images = images.filter(|images| !images.is_empty());
        let messages = match images {
            Some(images) if supports_multimodal(self.model_name()) => {
                info!(count = images.len(), "Attaching images for multimodal model");
                prepare_multimodal_messages(messages, Some(images.as_slice())).await?
            }
            Some(images) => {
                debug!(
                    count = images.len(),
                    "Model is not multimodal; ignoring supplied images"
                );
                messages.into_messages()
            }
            None => messages.into_messages(),
        };

        let params = self.inner.build_params(messages, tools);
        self.handle_non_streaming_response(params, &callbacks, available_functions.as_ref())
            .await
    }
}
