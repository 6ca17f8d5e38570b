//! Display helpers
//!
//! Formatting used when rendering the catalog: prices per 1K tokens, context
//! sizes, cost tier labels and truncated text.

use crate::types::model::{CostTier, ModelInfo};

/// Per-token price rendered per 1K tokens
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "Free".to_string();
    }

    let per_thousand = price * 1000.0;
    if per_thousand < 0.01 {
        format!("${:.4}/1K", per_thousand)
    } else {
        format!("${:.2}/1K", per_thousand)
    }
}

pub fn format_context_length(context: Option<u64>) -> String {
    match context {
        None | Some(0) => "Unknown".to_string(),
        Some(c) if c >= 1_000_000 => format!("{:.1}M", c as f64 / 1_000_000.0),
        Some(c) if c >= 1_000 => format!("{:.0}K", c as f64 / 1_000.0),
        Some(c) => c.to_string(),
    }
}

pub fn cost_tier_label(tier: CostTier) -> &'static str {
    match tier {
        CostTier::Free => "Free",
        CostTier::Low => "Low Cost",
        CostTier::Medium => "Medium Cost",
        CostTier::High => "High Cost",
    }
}

/// Badge colour as a hex string
pub fn cost_tier_color(tier: CostTier) -> &'static str {
    match tier {
        CostTier::Free => "#10b981",
        CostTier::Low => "#3b82f6",
        CostTier::Medium => "#f59e0b",
        CostTier::High => "#ef4444",
    }
}

/// Cut to at most `max_chars` characters, ending in "..." when shortened
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// First `limit` feature tags and how many were left out
pub fn visible_features(model: &ModelInfo, limit: usize) -> (&[String], usize) {
    let shown = model.features.len().min(limit);
    (&model.features[..shown], model.features.len() - shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback::builtin_models;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "Free");
        assert_eq!(format_price(0.000005), "$0.0050/1K");
        assert_eq!(format_price(0.00003), "$0.03/1K");
        assert_eq!(format_price(0.01), "$10.00/1K");
    }

    #[test]
    fn test_format_context_length() {
        assert_eq!(format_context_length(None), "Unknown");
        assert_eq!(format_context_length(Some(0)), "Unknown");
        assert_eq!(format_context_length(Some(512)), "512");
        assert_eq!(format_context_length(Some(128_000)), "128K");
        assert_eq!(format_context_length(Some(1_048_576)), "1.0M");
    }

    #[test]
    fn test_cost_tier_display() {
        assert_eq!(cost_tier_label(CostTier::Medium), "Medium Cost");
        assert_eq!(cost_tier_color(CostTier::Free), "#10b981");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a long description", 10), "a long ...");
        assert_eq!(truncate_text("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_visible_features() {
        let claude = builtin_models()
            .into_iter()
            .find(|m| m.features.len() == 4)
            .unwrap();
        let (shown, hidden) = visible_features(&claude, 3);
        assert_eq!(shown.len(), 3);
        assert_eq!(hidden, 1);

        let (shown, hidden) = visible_features(&claude, 10);
        assert_eq!(shown.len(), 4);
        assert_eq!(hidden, 0);
    }
}
