//! image-insights: describe images with multimodal LLMs
//!
//! # Overview
//!
//! Submit an image (URL, local path, raw bytes or a provider-specific part) and
//! get back a natural-language description produced by a remote multimodal
//! model behind a chat-completion API.
//!
//! Building blocks:
//! - [`prepare_multimodal_messages`] attaches image parts to a chat message list
//! - [`ChatClient`] issues chat completions through a [`CompletionBackend`]
//! - [`MultimodalClient`] wraps a `ChatClient` and attaches images for
//!   multimodal models
//! - [`Agent`], [`Task`] and [`Crew`] run a persona-bound task against a client
//! - [`ImageAnalyst`] wires all of the above into the image-analysis crew used
//!   by the CLI and the web form
//!
//! # Quick Start
//!
//! ```no_run
//! use image_insights::{Config, ImageAnalyst, ImageAnalyzer, ImageReference};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY from the environment or a .env file
//!     let analyst = ImageAnalyst::new(Config::load()?)?;
//!
//!     let image = ImageReference::parse("https://example.com/landmark.jpg");
//!     let output = analyst.analyze(&image).await?;
//!
//!     println!("{}", output);
//!     Ok(())
//! }
//! ```

pub mod analysis;
mod backend;
pub mod config;
pub mod crew;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
#[cfg(feature = "web")]
pub mod web;

// Re-exports for convenience
pub use error::{ApiErrorKind, InsightError, Result};

pub use analysis::{DEFAULT_IMAGE_URL, ImageAnalyst, ImageAnalyzer};
pub use config::Config;
pub use crew::{Agent, Crew, CrewOutput, Task, TaskOutput, extract_final_answer};

pub use backend::{
    CallOptions, ChatClient, ClientConfig, CompletionBackend, CompletionCallback,
    CompletionParams, CompletionResponse, ContentPart, FunctionTable, HttpCompletionBackend,
    ImageReference, LlmClient, MULTIMODAL_MODEL_MARKERS, Message, MessageContent, MessageInput,
    MultimodalClient, Role, TokenUsage, ToolDefinition, ToolFunction, prepare_multimodal_messages,
    supports_multimodal, wire_model_name,
};
pub use backend::{Choice, FunctionCall, FunctionDefinition, ResponseMessage, ToolCall, UsageInfo};
