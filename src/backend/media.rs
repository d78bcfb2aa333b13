use std::fmt;
use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::backend::message::ContentPart;
use crate::error::{InsightError, Result};

/// An image handed to the model.
///
/// Built once where user input is accepted; everything downstream matches on
/// the variant.
///
/// ```
/// use image_insights::ImageReference;
///
/// let remote = ImageReference::parse("https://example.com/cat.jpg");
/// assert!(matches!(remote, ImageReference::Url(_)));
///
/// let local = ImageReference::parse("photos/cat.jpg");
/// assert!(matches!(local, ImageReference::Path(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ImageReference {
    /// `http://` or `https://` URL, sent as an image-by-URL part
    Url(String),
    /// Local file, read and inlined as base64
    Path(PathBuf),
    /// Raw bytes, inlined as base64
    Bytes(Vec<u8>),
    /// Provider-specific part, passed through unchanged
    Descriptor(Map<String, Value>),
}

impl ImageReference {
    /// Classify a user-supplied string: URLs by scheme prefix, anything else is a path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            ImageReference::Url(input.to_string())
        } else {
            ImageReference::Path(PathBuf::from(input))
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        ImageReference::Path(path.as_ref().to_path_buf())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ImageReference::Bytes(bytes.into())
    }

    /// True when the reference can be shown by a browser as-is.
    pub fn is_url(&self) -> bool {
        matches!(self, ImageReference::Url(_))
    }

    /// Turn the reference into a message content part.
    ///
    /// Local files are read here.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::LocalIo`] when a path cannot be read.
    pub async fn to_content_part(&self) -> Result<ContentPart> {
        match self {
            ImageReference::Url(url) => {
                trace!(url = %url, "Using image by URL");
                Ok(ContentPart::image_url(url.clone()))
            }
            ImageReference::Path(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| InsightError::LocalIo {
                        path: path.clone(),
                        source,
                    })?;
                debug!(path = %path.display(), bytes = bytes.len(), "Inlining local image");
                Ok(ContentPart::InlineImage {
                    data: encode_base64(&bytes),
                })
            }
            ImageReference::Bytes(bytes) => {
                debug!(bytes = bytes.len(), "Inlining image bytes");
                Ok(ContentPart::InlineImage {
                    data: encode_base64(bytes),
                })
            }
            ImageReference::Descriptor(map) => Ok(ContentPart::Descriptor(map.clone())),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageReference::Url(url) => write!(f, "{}", url),
            ImageReference::Path(path) => write!(f, "{}", path.display()),
            ImageReference::Bytes(bytes) => write!(f, "<{} bytes of image data>", bytes.len()),
            ImageReference::Descriptor(map) => write!(f, "{}", Value::Object(map.clone())),
        }
    }
}

impl From<&str> for ImageReference {
    fn from(input: &str) -> Self {
        ImageReference::parse(input)
    }
}

impl From<String> for ImageReference {
    fn from(input: String) -> Self {
        ImageReference::parse(&input)
    }
}

impl From<PathBuf> for ImageReference {
    fn from(path: PathBuf) -> Self {
        ImageReference::Path(path)
    }
}

impl From<Vec<u8>> for ImageReference {
    fn from(bytes: Vec<u8>) -> Self {
        ImageReference::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageReference {
    fn from(bytes: &[u8]) -> Self {
        ImageReference::Bytes(bytes.to_vec())
    }
}

impl From<Map<String, Value>> for ImageReference {
    fn from(map: Map<String, Value>) -> Self {
        ImageReference::Descriptor(map)
    }
}

/// Boundary for loosely typed input (JSON request bodies, config files).
///
/// Strings are classified with [`ImageReference::parse`], objects become
/// descriptors and arrays of byte values become raw bytes. Anything else is
/// rejected with [`InsightError::UnsupportedImageType`].
impl TryFrom<Value> for ImageReference {
    type Error = InsightError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(ImageReference::parse(&s)),
            Value::Object(map) => Ok(ImageReference::Descriptor(map)),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| unsupported("array"))
                })
                .collect::<Result<Vec<u8>>>()
                .map(ImageReference::Bytes),
            Value::Null => Err(unsupported("null")),
            Value::Bool(_) => Err(unsupported("boolean")),
            Value::Number(_) => Err(unsupported("number")),
        }
    }
}

fn unsupported(type_name: &str) -> InsightError {
    InsightError::UnsupportedImageType(type_name.to_string())
}

pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}
