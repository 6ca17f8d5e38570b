//! Built-in fallback catalog
//!
//! Served when the listing cannot be fetched and nothing is cached, so callers
//! never see an empty catalog because of a transient network failure.

use crate::types::model::{features, CostTier, ModelInfo, Pricing};

fn entry(
    id: &str,
    name: &str,
    description: &str,
    cost_tier: CostTier,
    (input, output): (f64, f64),
    context: u64,
    tags: &[&str],
) -> ModelInfo {
    let has = |tag: &str| tags.contains(&tag);
    ModelInfo {
        id: id.to_string(),
        name: name.to_string(),
        provider: crate::catalog::classify::extract_provider(id),
        cost_tier,
        description: description.to_string(),
        features: tags.iter().map(|t| t.to_string()).collect(),
        pricing: Some(Pricing::usd(input, output)),
        context: Some(context),
        multimodal: has(features::VISION),
        reasoning: has(features::REASONING),
        stream_cancel: has(features::STREAM_CANCEL),
    }
}

/// Pre-classified models covering free, paid, reasoning and stream-cancel entries
pub fn builtin_models() -> Vec<ModelInfo> {
    vec![
        entry(
            "openai/gpt-4o-mini",
            "GPT-4o Mini",
            "Fast and affordable multimodal model",
            CostTier::Low,
            (0.00000015, 0.0000006),
            128_000,
            &[features::VISION, features::STREAM_CANCEL, features::LONG_CONTEXT],
        ),
        entry(
            "openai/gpt-4o",
            "GPT-4o",
            "Most capable multimodal model",
            CostTier::Medium,
            (0.0000025, 0.00001),
            128_000,
            &[features::VISION, features::STREAM_CANCEL, features::LONG_CONTEXT],
        ),
        entry(
            "anthropic/claude-3.7-sonnet:thinking",
            "Claude 3.7 Sonnet (thinking)",
            "Balanced performance and cost with extended thinking",
            CostTier::Medium,
            (0.000003, 0.000015),
            200_000,
            &[
                features::VISION,
                features::REASONING,
                features::STREAM_CANCEL,
                features::LONG_CONTEXT,
            ],
        ),
        entry(
            "deepseek/deepseek-r1:free",
            "DeepSeek R1 (free)",
            "Open reasoning model",
            CostTier::Free,
            (0.0, 0.0),
            163_840,
            &[
                features::REASONING,
                features::STREAM_CANCEL,
                features::LONG_CONTEXT,
                features::FREE,
            ],
        ),
        entry(
            "meta-llama/llama-3.3-70b-instruct:free",
            "Llama 3.3 70B Instruct (free)",
            "Multilingual instruction-tuned model",
            CostTier::Free,
            (0.0, 0.0),
            131_072,
            &[features::LONG_CONTEXT, features::FREE],
        ),
    ]
}
