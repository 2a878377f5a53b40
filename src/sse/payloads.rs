//! SSE payload deserialization structs
//!
//! Structured payload shapes the interpreter recognizes. Backends disagree on
//! where the incremental text lives, so several layouts are accepted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Structured content chunk.
///
/// Every field is lenient: a value of an unexpected type reads as absent
/// instead of failing the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChunkPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    /// Some backends nest content in a delta object
    #[serde(default, deserialize_with = "lenient")]
    pub delta: Option<DeltaPayload>,
    /// OpenAI style: `choices[].delta.content`
    #[serde(default, deserialize_with = "lenient_seq")]
    pub choices: Vec<ChoicePayload>,
}

/// Nested delta payload
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DeltaPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChoicePayload {
    #[serde(default, deserialize_with = "lenient")]
    pub delta: Option<DeltaPayload>,
}

/// Read any JSON value, keeping it only if it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`] for arrays: a non-array is empty, bad elements are skipped.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

impl ChunkPayload {
    /// First recognized content field, in priority order.
    pub fn into_fragment(self) -> Option<String> {
        if let Some(content) = self.content {
            return Some(content);
        }
        if let Some(text) = self.text {
            return Some(text);
        }
        if let Some(delta) = self.delta {
            if let Some(text) = delta.content.or(delta.text) {
                return Some(text);
            }
        }
        self.choices
            .into_iter()
            .find_map(|choice| choice.delta.and_then(|d| d.content))
    }
}
