use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::message::Message;
use crate::backend::usage::TokenUsage;

/// Provider prefixes that name a routing target rather than a model.
const PROVIDER_PREFIXES: &[&str] = &["gemini/", "openai/"];

/// Strip a routing prefix such as `gemini/` from a model identifier.
///
/// ```
/// use image_insights::wire_model_name;
///
/// assert_eq!(wire_model_name("gemini/gemini-2.0-flash-exp"), "gemini-2.0-flash-exp");
/// assert_eq!(wire_model_name("gemini-2.0-flash"), "gemini-2.0-flash");
/// ```
pub fn wire_model_name(model: &str) -> &str {
    PROVIDER_PREFIXES
        .iter()
        .find_map(|prefix| model.strip_prefix(prefix))
        .unwrap_or(model)
}

/// Tool definition in the chat-completion `tools` shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    /// A `function` tool with a JSON schema for its arguments.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Full parameter set of one completion call.
///
/// The credential and timeout travel with the request but are not part of the
/// JSON body. Provider-specific options are flattened into the body.
#[derive(Clone, Serialize)]
pub struct CompletionParams {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip)]
    pub api_key: String,
    #[serde(skip)]
    pub timeout: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl fmt::Debug for CompletionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionParams")
            .field("model", &self.model)
            .field("messages", &self.messages.len())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("tools", &self.tools.as_ref().map(Vec::len))
            .field("options", &self.options)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsageInfo {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Chat-completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<UsageInfo>,
    #[serde(default)]
    pub model: Option<String>,
}

impl CompletionResponse {
    pub fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Text of the first choice, empty when the provider sent none.
    pub fn first_content(&self) -> String {
        self.first_message()
            .and_then(|message| message.content.clone())
            .unwrap_or_default()
    }

    /// Usage as [`TokenUsage`], falling back to the requested model name.
    pub fn token_usage(&self, requested_model: &str) -> Option<TokenUsage> {
        self.usage.as_ref().map(|usage| {
            TokenUsage::new(
                self.model.as_deref().unwrap_or(requested_model),
                usage.prompt_tokens,
                usage.completion_tokens,
            )
        })
    }
}
