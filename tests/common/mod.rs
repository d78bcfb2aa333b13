use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image_insights::{CompletionBackend, CompletionParams, CompletionResponse, Result};
use serde_json::{Value, json};

pub const LANDMARK_URL: &str =
    "https://storage.googleapis.com/github-repo/img/gemini/intro/landmark3.jpg";

/// What the mock saw for one call.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub api_key: String,
    pub body: Value,
}

/// Completion backend answering from a queue of canned responses.
///
/// When the queue is empty it answers with `fallback`.
#[allow(dead_code)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<CompletionResponse>>>,
    fallback: String,
    calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: text.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_responses(responses: Vec<Result<CompletionResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            fallback: String::new(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Value {
        self.calls().last().expect("no call recorded").body.clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn complete(&self, params: &CompletionParams) -> Result<CompletionResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            api_key: params.api_key.clone(),
            body: serde_json::to_value(params).unwrap(),
        });
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(text_response(&self.fallback)),
        }
    }
}

/// A one-choice response with usage.
#[allow(dead_code)]
pub fn text_response(text: &str) -> CompletionResponse {
    serde_json::from_value(json!({
        "model": "gemini-2.0-flash-exp",
        "choices": [{
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .unwrap()
}

/// The `content` array of the last message in a recorded request body.
#[allow(dead_code)]
pub fn last_message_parts(body: &Value) -> Vec<Value> {
    body["messages"]
        .as_array()
        .and_then(|messages| messages.last())
        .and_then(|message| message["content"].as_array())
        .cloned()
        .unwrap_or_default()
}
