//! Listing endpoint wire types
//!
//! Mirrors the OpenRouter-compatible `GET /models` payload. Every nested field
//! tolerates `null` or absence so a single malformed record never fails the
//! whole listing; such records are rejected later by the availability filter.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level listing response: `{ "data": [...] }`
///
/// `data` itself is required; a body without it is a malformed response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelListResponse {
    pub data: Vec<RawModelRecord>,
}

/// One model descriptor exactly as the provider sends it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawModelRecord {
    /// Provider-prefixed identifier, e.g. `openai/gpt-4o-mini`
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pricing: Option<RawPricing>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub context_length: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub architecture: RawArchitecture,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_provider: RawTopProvider,
    #[serde(default)]
    pub per_request_limits: Option<RawRequestLimits>,
}

/// Per-token prices as decimal strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPricing {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub completion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArchitecture {
    #[serde(default)]
    pub modality: Option<String>,
    #[serde(default)]
    pub tokenizer: Option<String>,
    #[serde(default)]
    pub instruct_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub input_modalities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output_modalities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTopProvider {
    #[serde(default, deserialize_with = "lenient_count")]
    pub max_completion_tokens: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_moderated: bool,
}

/// Optional per-request token ceilings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRequestLimits {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub prompt_tokens: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub completion_tokens: Option<String>,
}

impl RawModelRecord {
    /// Prompt price text, if the record carries one
    pub fn prompt_price(&self) -> Option<&str> {
        self.pricing.as_ref().and_then(|p| p.prompt.as_deref())
    }

    /// Completion price text, if the record carries one
    pub fn completion_price(&self) -> Option<&str> {
        self.pricing.as_ref().and_then(|p| p.completion.as_deref())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `"0.000001"`, `0.000001` or `null`; numbers are kept as their text.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Token counts: integers, integral floats, or anything else as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        _ => None,
    })
}
