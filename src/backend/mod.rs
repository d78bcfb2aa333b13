pub mod adapter;
pub mod client;
pub mod completion;
pub mod media;
pub mod message;
pub mod multimodal;
pub mod openai_compatible;
pub mod usage;
pub mod utils;

pub use adapter::prepare_multimodal_messages;
pub use client::{
    CallOptions, ChatClient, ClientConfig, CompletionCallback, FunctionTable, LlmClient,
    ToolFunction,
};
pub use completion::{CompletionBackend, HttpCompletionBackend};
pub use media::ImageReference;
pub use message::{ContentPart, Message, MessageContent, MessageInput, Role};
pub use multimodal::{MULTIMODAL_MODEL_MARKERS, MultimodalClient, supports_multimodal};
pub use openai_compatible::{
    Choice, CompletionParams, CompletionResponse, FunctionCall, FunctionDefinition,
    ResponseMessage, ToolCall, ToolDefinition, UsageInfo, wire_model_name,
};
pub use usage::TokenUsage;
