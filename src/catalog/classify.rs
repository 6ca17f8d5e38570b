//! Raw record classification
//!
//! Turns one [`RawModelRecord`] into a [`ModelInfo`]. Classification is total:
//! missing or unparseable fields fall back to neutral values instead of failing.
//!
//! Reasoning and stream-cancel detection are heuristics. Neither is derived from
//! an authoritative API field; both are maintained tables that need updating as
//! new model families and providers appear. Treat the flags as hints.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::model::{features, CostTier, ModelInfo, Pricing};
use crate::types::raw::RawModelRecord;

pub const UNKNOWN_PROVIDER: &str = "Unknown";
pub const NO_DESCRIPTION: &str = "No description available";

/// Contexts strictly above this get the "Long Context" tag
pub const LONG_CONTEXT_THRESHOLD: i64 = 100_000;

/// Average per-token price below which a paid model is `low`
pub const LOW_TIER_CEILING: f64 = 0.000001;
/// Average per-token price below which a paid model is `medium`
pub const MEDIUM_TIER_CEILING: f64 = 0.00001;

/// A known reasoning-model family and the pattern matched against the lower-cased id
#[derive(Debug, Clone, Copy)]
pub struct ReasoningRule {
    pub family: &'static str,
    pub pattern: &'static str,
}

pub const REASONING_RULES: &[ReasoningRule] = &[
    ReasoningRule {
        family: "OpenAI o-series",
        pattern: r"(^|/)o[1-9](-[a-z0-9-]+)?(:[a-z]+)?$",
    },
    ReasoningRule {
        family: "DeepSeek R1",
        pattern: r"deepseek[-/.a-z0-9]*r1|deepseek-reasoner",
    },
    ReasoningRule {
        family: "Gemini thinking",
        pattern: r"gemini.*thinking",
    },
    ReasoningRule {
        family: "Claude thinking",
        pattern: r"(claude|anthropic).*thinking",
    },
    ReasoningRule {
        family: "Grok reasoning",
        pattern: r"grok.*reason",
    },
    ReasoningRule {
        family: "QwQ",
        pattern: r"qwq",
    },
    ReasoningRule {
        family: "Generic reasoning model",
        pattern: r"reason(ing|er)",
    },
    ReasoningRule {
        family: "Generic thinking model",
        pattern: r"think(ing|er)",
    },
];

/// Providers (lower-cased id prefix) known to honour mid-stream cancellation
pub const STREAM_CANCEL_PROVIDERS: &[&str] = &[
    "openai",
    "azure",
    "anthropic",
    "fireworks",
    "mancer",
    "recursal",
    "anyscale",
    "lepton",
    "octoai",
    "novita",
    "deepinfra",
    "together",
    "cohere",
    "hyperbolic",
    "infermatic",
    "avian",
    "x-ai",
    "xai",
    "cloudflare",
    "sfcompute",
    "nineteen",
    "liquid",
    "friendli",
    "chutes",
    "deepseek",
];

static COMPILED_REASONING_RULES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    REASONING_RULES
        .iter()
        .filter_map(|rule| match Regex::new(rule.pattern) {
            Ok(re) => Some((rule.family, re)),
            Err(e) => {
                tracing::error!("Invalid reasoning pattern for {}: {}", rule.family, e);
                None
            }
        })
        .collect()
});

/// Classify one raw record
pub fn classify(record: &RawModelRecord) -> ModelInfo {
    let provider = extract_provider(&record.id);
    let input = parse_price(record.prompt_price());
    let output = parse_price(record.completion_price());
    let cost_tier = cost_tier(input, output);
    let multimodal = is_multimodal(record);
    let reasoning = is_reasoning_model(&record.id);
    let stream_cancel = supports_stream_cancel(&provider);

    let mut tags: Vec<String> = Vec::new();
    if multimodal {
        push_tag(&mut tags, features::VISION);
    }
    if reasoning {
        push_tag(&mut tags, features::REASONING);
    }
    if stream_cancel {
        push_tag(&mut tags, features::STREAM_CANCEL);
    }
    if record.top_provider.is_moderated {
        push_tag(&mut tags, features::MODERATED);
    }
    if record.context_length.unwrap_or(0) > LONG_CONTEXT_THRESHOLD {
        push_tag(&mut tags, features::LONG_CONTEXT);
    }
    if record
        .architecture
        .instruct_type
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty())
    {
        push_tag(&mut tags, features::INSTRUCT);
    }
    if cost_tier.is_free() {
        push_tag(&mut tags, features::FREE);
    }

    let name = if record.name.trim().is_empty() {
        record.id.clone()
    } else {
        record.name.clone()
    };

    let description = record
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    ModelInfo {
        id: record.id.clone(),
        name,
        provider,
        cost_tier,
        description,
        features: tags,
        pricing: Some(Pricing::usd(input, output)),
        context: record
            .context_length
            .filter(|&c| c > 0)
            .map(|c| c as u64),
        multimodal,
        reasoning,
        stream_cancel,
    }
}

/// Text before the first `/`, first character upper-cased; `Unknown` without a `/`.
pub fn extract_provider(model_id: &str) -> String {
    match model_id.split_once('/') {
        Some((prefix, _)) => capitalize(prefix),
        None => UNKNOWN_PROVIDER.to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a decimal price; anything absent, non-numeric or non-finite is 0.
pub fn parse_price(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Bucket per-token prices into a tier
pub fn cost_tier(input: f64, output: f64) -> CostTier {
    if input == 0.0 && output == 0.0 {
        return CostTier::Free;
    }

    let average = (input + output) / 2.0;
    if average < LOW_TIER_CEILING {
        CostTier::Low
    } else if average < MEDIUM_TIER_CEILING {
        CostTier::Medium
    } else {
        CostTier::High
    }
}

pub fn is_multimodal(record: &RawModelRecord) -> bool {
    record
        .architecture
        .input_modalities
        .iter()
        .any(|m| m == "image")
        || record.architecture.modality.as_deref() == Some("multimodal")
}

/// Family name of the first reasoning rule matching `model_id`
pub fn reasoning_family(model_id: &str) -> Option<&'static str> {
    let id = model_id.to_lowercase();
    COMPILED_REASONING_RULES
        .iter()
        .find(|(_, re)| re.is_match(&id))
        .map(|(family, _)| *family)
}

/// Best-effort reasoning detection
pub fn is_reasoning_model(model_id: &str) -> bool {
    reasoning_family(model_id).is_some()
}

/// Best-effort stream-cancel support lookup by provider name
pub fn supports_stream_cancel(provider: &str) -> bool {
    let provider = provider.to_lowercase();
    STREAM_CANCEL_PROVIDERS.contains(&provider.as_str())
}

fn push_tag(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}
