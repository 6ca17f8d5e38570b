//! Model types
//!
//! Normalized model descriptors produced by the classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability tags, in the order the classifier appends them.
///
/// Callers usually render only the first few tags, so the order matters.
pub mod features {
    pub const VISION: &str = "Vision";
    pub const REASONING: &str = "Reasoning";
    pub const STREAM_CANCEL: &str = "Stream Cancel";
    pub const MODERATED: &str = "Moderated";
    pub const LONG_CONTEXT: &str = "Long Context";
    pub const INSTRUCT: &str = "Instruct";
    pub const FREE: &str = "Free";

    pub const ORDER: [&str; 7] = [
        VISION,
        REASONING,
        STREAM_CANCEL,
        MODERATED,
        LONG_CONTEXT,
        INSTRUCT,
        FREE,
    ];
}

/// Cost bucket derived from the average per-token price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Free,
    Low,
    Medium,
    High,
}

impl CostTier {
    pub const ALL: [CostTier; 4] = [CostTier::Free, CostTier::Low, CostTier::Medium, CostTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostTier::Free => "free",
            CostTier::Low => "low",
            CostTier::Medium => "medium",
            CostTier::High => "high",
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, CostTier::Free)
    }
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(CostTier::Free),
            "low" => Ok(CostTier::Low),
            "medium" => Ok(CostTier::Medium),
            "high" => Ok(CostTier::High),
            other => Err(format!("Unknown cost tier: {}", other)),
        }
    }
}

/// Per-token prices, both in the same currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input: f64,
    pub output: f64,
    pub currency: String,
}

impl Pricing {
    pub fn usd(input: f64, output: f64) -> Self {
        Self {
            input,
            output,
            currency: "USD".to_string(),
        }
    }
}

/// Normalized description of a selectable model
///
/// `id` is copied verbatim from the listing and is never rewritten; it is the
/// only source of provider attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub cost_tier: CostTier,
    pub description: String,
    /// Capability tags, unique, in [`features::ORDER`]
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    /// Context window in tokens
    #[serde(default)]
    pub context: Option<u64>,
    #[serde(default)]
    pub multimodal: bool,
    /// Best-effort guess from the id; see [`crate::catalog::classify::REASONING_RULES`]
    #[serde(default)]
    pub reasoning: bool,
    /// Best-effort guess from the provider; see [`crate::catalog::classify::STREAM_CANCEL_PROVIDERS`]
    #[serde(default)]
    pub stream_cancel: bool,
}

impl ModelInfo {
    pub fn has_feature(&self, tag: &str) -> bool {
        self.features.iter().any(|f| f == tag)
    }
}
