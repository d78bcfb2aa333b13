use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One typed fragment of a multimodal message.
///
/// Serializes to the chat-completion part shapes:
///
/// - `Text` → `{"type": "text", "text": ...}`
/// - `ImageUrl` → `{"type": "image_url", "image_url": {"url": ...}}`
/// - `InlineImage` → `{"type": "image", "image": <base64>}`
/// - `Descriptor` → the map as given
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "Value")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { url: String },
    /// Base64-encoded image bytes
    InlineImage { data: String },
    /// Pre-formed provider-specific part, passed through untouched
    Descriptor(Map<String, Value>),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl { url: url.into() }
    }
}

impl From<ContentPart> for Value {
    fn from(part: ContentPart) -> Self {
        match part {
            ContentPart::Text { text } => json!({ "type": "text", "text": text }),
            ContentPart::ImageUrl { url } => {
                json!({ "type": "image_url", "image_url": { "url": url } })
            }
            ContentPart::InlineImage { data } => json!({ "type": "image", "image": data }),
            ContentPart::Descriptor(map) => Value::Object(map),
        }
    }
}

/// Content of a message: plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Concatenated text of the content, ignoring image parts.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Input accepted by the adapter and the clients: a bare prompt or a message list.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageInput {
    Text(String),
    Messages(Vec<Message>),
}

impl MessageInput {
    /// Normalize into a message list; a bare prompt becomes one user message.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            MessageInput::Text(text) => vec![Message::user(text)],
            MessageInput::Messages(messages) => messages,
        }
    }
}

impl From<&str> for MessageInput {
    fn from(text: &str) -> Self {
        MessageInput::Text(text.to_string())
    }
}

impl From<String> for MessageInput {
    fn from(text: String) -> Self {
        MessageInput::Text(text)
    }
}

impl From<Vec<Message>> for MessageInput {
    fn from(messages: Vec<Message>) -> Self {
        MessageInput::Messages(messages)
    }
}

impl From<&[Message]> for MessageInput {
    fn from(messages: &[Message]) -> Self {
        MessageInput::Messages(messages.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serializes_as_string_content() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json, json!({ "role": "user", "content": "hello" }));
    }

    #[test]
    fn test_part_shapes() {
        let parts = vec![
            ContentPart::text("look"),
            ContentPart::image_url("https://x/y.jpg"),
            ContentPart::InlineImage {
                data: "YWJj".to_string(),
            },
        ];
        let json = serde_json::to_value(Message::user(parts)).unwrap();
        assert_eq!(
            json["content"],
            json!([
                { "type": "text", "text": "look" },
                { "type": "image_url", "image_url": { "url": "https://x/y.jpg" } },
                { "type": "image", "image": "YWJj" }
            ])
        );
    }

    #[test]
    fn test_descriptor_passes_through() {
        let mut map = Map::new();
        map.insert("type".into(), json!("file"));
        map.insert("file_id".into(), json!("abc"));
        let json = serde_json::to_value(ContentPart::Descriptor(map.clone())).unwrap();
        assert_eq!(json, Value::Object(map));
    }

    #[test]
    fn test_bare_prompt_becomes_user_message() {
        let messages = MessageInput::from("Describe this").into_messages();
        assert_eq!(messages, vec![Message::user("Describe this")]);
    }

    #[test]
    fn test_content_text_skips_images() {
        let content = MessageContent::Parts(vec![
            ContentPart::text("a"),
            ContentPart::image_url("https://x"),
            ContentPart::text("b"),
        ]);
        assert_eq!(content.text(), "a\nb");
    }
}
