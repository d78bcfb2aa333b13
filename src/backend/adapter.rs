//! Multimodal message preparation.

use tracing::{debug, instrument, warn};

use crate::backend::media::ImageReference;
use crate::backend::message::{ContentPart, Message, MessageContent, MessageInput, Role};
use crate::error::{InsightError, Result};

/// Attach images to a chat message list.
///
/// A bare prompt becomes a single user message. Every image is converted to a
/// content part (local files are read here), and the parts are attached to the
/// last message when that message comes from the user: list content is
/// extended, text content becomes `[text, images...]`.
///
/// When the last message has any other role the image parts are dropped and a
/// warning is logged. The input is copied, never modified.
///
/// # Errors
///
/// - [`InsightError::LocalIo`] when a local image cannot be read
/// - [`InsightError::ValidationError`] when images are given with an empty message list
///
/// # Example
///
/// ```
/// # async fn example() -> image_insights::Result<()> {
/// use image_insights::{ImageReference, prepare_multimodal_messages};
///
/// let images = [ImageReference::parse("https://x/y.jpg")];
/// let messages = prepare_multimodal_messages("Describe this", Some(images.as_slice())).await?;
/// assert_eq!(
///     serde_json::to_value(&messages).unwrap(),
///     serde_json::json!([{
///         "role": "user",
///         "content": [
///             {"type": "text", "text": "Describe this"},
///             {"type": "image_url", "image_url": {"url": "https://x/y.jpg"}}
///         ]
///     }])
/// );
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "prepare_multimodal_messages",
    skip(messages, images),
    fields(images = images.map_or(0, |i| i.len()))
)]
pub async fn prepare_multimodal_messages(
    messages: impl Into<MessageInput>,
    images: Option<&[ImageReference]>,
) -> Result<Vec<Message>> {
    let mut prepared = messages.into().into_messages();

    let Some(images) = images.filter(|images| !images.is_empty()) else {
        return Ok(prepared);
    };

    let mut image_parts = Vec::with_capacity(images.len());
    for image in images {
        image_parts.push(image.to_content_part().await?);
    }

    let Some(last) = prepared.last_mut() else {
        return Err(InsightError::ValidationError(
            "cannot attach images to an empty message list".to_string(),
        ));
    };

    if last.role != Role::User {
        warn!(
            role = last.role.as_str(),
            dropped = image_parts.len(),
            "Last message is not from the user; image parts were not attached"
        );
        return Ok(prepared);
    }

    debug!(parts = image_parts.len(), "Attaching image parts to last user message");
    if let MessageContent::Text(text) = &mut last.content {
        let text = std::mem::take(text);
        last.content = MessageContent::Parts(vec![ContentPart::text(text)]);
    }
    if let MessageContent::Parts(parts) = &mut last.content {
        parts.extend(image_parts);
    }

    Ok(prepared)
}
