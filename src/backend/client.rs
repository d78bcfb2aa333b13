use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::backend::completion::{CompletionBackend, HttpCompletionBackend};
use crate::backend::media::ImageReference;
use crate::backend::message::{Message, MessageInput};
use crate::backend::openai_compatible::{
    CompletionParams, CompletionResponse, ToolDefinition, wire_model_name,
};
use crate::backend::usage::TokenUsage;
use crate::config::{Config, missing_api_key};
use crate::error::{InsightError, Result};

/// Hook notified after every successful completion call.
pub trait CompletionCallback: Send + Sync {
    fn on_success(&self, usage: &TokenUsage);
}

/// A function the model may ask to run through a tool call.
///
/// Receives the parsed JSON arguments; its string result becomes the answer of
/// the call.
pub type ToolFunction = Arc<dyn Fn(Value) -> Result<String> + Send + Sync>;

/// Tool name → function.
pub type FunctionTable = HashMap<String, ToolFunction>;

/// Optional inputs of [`LlmClient::call`].
#[derive(Clone, Default)]
pub struct CallOptions {
    pub tools: Option<Vec<ToolDefinition>>,
    pub callbacks: Vec<Arc<dyn CompletionCallback>>,
    pub available_functions: Option<FunctionTable>,
    /// Images to attach; only honoured by multimodal-aware clients
    pub images: Option<Vec<ImageReference>>,
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("tools", &self.tools.as_ref().map(Vec::len))
            .field("callbacks", &self.callbacks.len())
            .field(
                "available_functions",
                &self
                    .available_functions
                    .as_ref()
                    .map(|table| table.keys().cloned().collect::<Vec<_>>()),
            )
            .field("images", &self.images)
            .finish()
    }
}

impl CallOptions {
    pub fn with_images(mut self, images: Vec<ImageReference>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_callback(mut self, callback: Arc<dyn CompletionCallback>) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn with_function(mut self, name: impl Into<String>, function: ToolFunction) -> Self {
        self.available_functions
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), function);
        self
    }
}

/// The call surface the agents reason through.
///
/// Implemented by the plain [`ChatClient`] and by the image-aware
/// [`MultimodalClient`](crate::MultimodalClient) that wraps it.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier as configured (may carry a provider prefix)
    fn model_name(&self) -> &str;

    /// Send `messages` and return the model's text answer.
    async fn call(&self, messages: MessageInput, options: CallOptions) -> Result<String>;
}

/// Settings of a completion client.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    /// Extra provider-specific request fields
    pub options: Map<String, Value>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("options", &self.options)
            .finish()
    }
}

/// Generic chat-completion client with no knowledge of images.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> image_insights::Result<()> {
/// use image_insights::{CallOptions, ChatClient, LlmClient};
///
/// let client = ChatClient::new("your-gemini-api-key")?
///     .model("gemini/gemini-2.0-flash")
///     .temperature(0.0);
///
/// let answer = client.call("Say hello".into(), CallOptions::default()).await?;
/// println!("{}", answer);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChatClient {
    pub(crate) config: ClientConfig,
    backend: Arc<dyn CompletionBackend>,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("config", &self.config)
            .field("provider", &self.backend.provider_name())
            .finish()
    }
}

impl ChatClient {
    /// Create a client for the default model and endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::ConfigurationError`] when the key is empty.
    #[instrument(name = "chat_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&Config::new(api_key)?)
    }

    /// Create a client from a validated [`Config`].
    #[instrument(name = "chat_client_from_config", skip(config), fields(model = %config.model))]
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = HttpCompletionBackend::new(config.base_url.clone());
        Self::from_config_with_backend(config, Arc::new(backend))
    }

    /// Apply every setting of `config` to a client over `backend`.
    ///
    /// `config.base_url` is ignored; the backend decides where requests go.
    pub fn from_config_with_backend(
        config: &Config,
        backend: Arc<dyn CompletionBackend>,
    ) -> Result<Self> {
        let mut client = Self::with_backend(&config.api_key, backend)?.model(config.model.clone());
        client.config.temperature = config.temperature;
        client.config.max_tokens = config.max_tokens;
        client.config.timeout = config.timeout;
        Ok(client)
    }

    /// Create a client over any completion backend.
    pub fn with_backend(
        api_key: impl Into<String>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(missing_api_key());
        }

        let config = ClientConfig {
            api_key,
            model: crate::config::DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            timeout: None, // Default: no timeout
            options: Map::new(),
        };

        info!(
            model = %config.model,
            provider = backend.provider_name(),
            "Created chat client"
        );
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.backend.provider_name()
    }

    /// Build the request parameters for one call.
    pub fn build_params(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolDefinition>>,
    ) -> CompletionParams {
        CompletionParams {
            model: wire_model_name(&self.config.model).to_string(),
            messages,
            api_key: self.config.api_key.clone(),
            timeout: self.config.timeout,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            tools: tools.filter(|tools| !tools.is_empty()),
            options: self.config.options.clone(),
        }
    }

    /// Issue one completion call through the backend.
    pub async fn complete(&self, params: &CompletionParams) -> Result<CompletionResponse> {
        self.backend.complete(params).await
    }

    /// Complete `params` and turn the response into text.
    ///
    /// Reports usage to the callbacks, runs a requested tool when it is in
    /// `available_functions`, and otherwise returns the first choice's content
    /// (empty when absent).
    #[instrument(
        name = "chat_non_streaming",
        skip_all,
        fields(model = %params.model, messages = params.messages.len())
    )]
    pub async fn handle_non_streaming_response(
        &self,
        params: CompletionParams,
        callbacks: &[Arc<dyn CompletionCallback>],
        available_functions: Option<&FunctionTable>,
    ) -> Result<String> {
        let response = self.complete(&params).await?;
        report_usage(&response, &params.model, callbacks);

        let Some(message) = response.first_message() else {
            warn!("Completion response carried no choices");
            return Ok(String::new());
        };

        if let (Some(tool_calls), Some(functions)) = (&message.tool_calls, available_functions) {
            for call in tool_calls {
                let Some(function) = functions.get(&call.function.name) else {
                    debug!(tool = %call.function.name, "Tool call for unknown function ignored");
                    continue;
                };
                let arguments = parse_arguments(&call.function.arguments)?;
                info!(tool = %call.function.name, "Dispatching tool call");
                return function(arguments);
            }
        }

        Ok(response.first_content())
    }
}

crate::impl_client_builder_methods! {
    client_type: ChatClient,
    config: config
}

#[async_trait]
impl LlmClient for ChatClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    #[instrument(name = "chat_call", skip(self, messages, options), fields(model = %self.config.model))]
    async fn call(&self, messages: MessageInput, options: CallOptions) -> Result<String> {
        if options.images.as_ref().is_some_and(|images| !images.is_empty()) {
            debug!("Plain chat client ignores images");
        }
        let params = self.build_params(messages.into_messages(), options.tools);
        self.handle_non_streaming_response(
            params,
            &options.callbacks,
            options.available_functions.as_ref(),
        )
        .await
    }
}

pub(crate) fn report_usage(
    response: &CompletionResponse,
    model: &str,
    callbacks: &[Arc<dyn CompletionCallback>],
) {
    if let Some(usage) = response.token_usage(model) {
        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Completion usage"
        );
        for callback in callbacks {
            callback.on_success(&usage);
        }
    }
}

fn parse_arguments(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(raw).map_err(|e| {
        InsightError::ValidationError(format!("Tool call arguments are not valid JSON: {}", e))
    })
}
