//! Manifest Data Model
//!
//! Wire types for the manifest document and the normalized message record
//! used by the renderer. The wire shape is deliberately loose: contributors
//! hand-write these JSON files, so every field is optional and several
//! field names are accepted for author and content.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Author shown when a record carries no author field
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Content shown when a record carries no message field
pub const DEFAULT_CONTENT: &str = "No message provided";

/// Identity used when a record carries no filename
pub const UNKNOWN_FILENAME: &str = "unknown";

/// One raw entry of the manifest, as written by a contributor.
///
/// `author`/`name` and `message`/`content`/`text` are interchangeable
/// variants; precedence is resolved in [`Message::from_raw`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub filename: Option<String>,
}

/// Accepts a string, or yields `None` for any other JSON type instead of
/// failing the whole record.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
}

/// The manifest document: an ordered sequence of raw messages
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub messages: Vec<RawMessage>,
}

impl Manifest {
    /// Decode a manifest from an already-parsed JSON value.
    ///
    /// A missing, null, or non-array `messages` field yields an empty
    /// manifest. A non-object entry degrades to an all-defaults record.
    pub fn from_value(value: &Value) -> Self {
        let messages = match value.get("messages") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        };

        Self { messages }
    }

    /// Decode a manifest from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(&value))
    }
}

/// A normalized message record, ready for rendering.
///
/// Invariant: `author` and `content` are non-empty, and `filename` always
/// carries an identity (possibly the literal "unknown").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub author: String,
    pub content: String,
    pub timestamp: Option<String>,
    pub filename: String,
}

impl Message {
    /// Build a normalized message from a raw record, first non-empty
    /// variant winning for author and content.
    pub fn from_raw(raw: &RawMessage) -> Self {
        let author = first_non_empty(&[&raw.author, &raw.name])
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        let content = first_non_empty(&[&raw.message, &raw.content, &raw.text])
            .unwrap_or_else(|| DEFAULT_CONTENT.to_string());

        let timestamp = raw
            .timestamp
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let filename = raw
            .filename
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_FILENAME)
            .to_string();

        Self {
            author,
            content,
            timestamp,
            filename,
        }
    }
}

fn first_non_empty(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}
