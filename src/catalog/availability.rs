//! Availability filtering
//!
//! Drops raw records that cannot be offered for selection: malformed entries,
//! zero-capacity entries, known-broken ids and models that look deprecated.
//! Records are never modified and the survivors keep their relative order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::types::raw::RawModelRecord;

/// Identifiers that are listed upstream but no longer serve requests
pub const DENIED_MODEL_IDS: &[&str] = &[
    "openai/gpt-4-vision-preview",
    "openai/gpt-4-32k",
    "openai/gpt-4-32k-0314",
    "anthropic/claude-instant-1",
    "anthropic/claude-2.0",
    "google/palm-2-chat-bison",
    "google/palm-2-codechat-bison",
];

/// Description phrases treated as a deprecation notice
pub const DEPRECATION_PHRASES: &[&str] = &[
    "deprecated",
    "has been deprecated",
    "please switch to",
    "no longer supported",
    "discontinued",
    "replaced by",
];

static DATED_EXPERIMENTAL_ID: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)-exp-\d{2}-\d{2}$")
        .map_err(|e| tracing::error!("Invalid experimental id pattern: {}", e))
        .ok()
});

/// Why a record was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BlankId,
    DeniedId,
    MissingContext,
    MissingPricing,
    ZeroRequestLimits,
    Deprecated(DeprecationSignal),
}

/// Which deprecation rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeprecationSignal {
    InstructType,
    Description,
    ExperimentalFree,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::BlankId => write!(f, "blank id"),
            Rejection::DeniedId => write!(f, "deny-listed id"),
            Rejection::MissingContext => write!(f, "missing or non-positive context length"),
            Rejection::MissingPricing => write!(f, "missing pricing"),
            Rejection::ZeroRequestLimits => write!(f, "zero per-request token limits"),
            Rejection::Deprecated(DeprecationSignal::InstructType) => {
                write!(f, "deprecated instruct type")
            }
            Rejection::Deprecated(DeprecationSignal::Description) => {
                write!(f, "deprecation notice in description")
            }
            Rejection::Deprecated(DeprecationSignal::ExperimentalFree) => {
                write!(f, "free experimental build")
            }
        }
    }
}

/// Keep only records that pass every availability check
pub fn filter_available(records: Vec<RawModelRecord>) -> Vec<RawModelRecord> {
    let before = records.len();
    let available: Vec<RawModelRecord> = records
        .into_iter()
        .filter(|record| match rejection(record) {
            Some(reason) => {
                tracing::debug!("Dropping model '{}': {}", record.id, reason);
                false
            }
            None => true,
        })
        .collect();

    if available.len() < before {
        tracing::debug!(
            "Availability filter kept {} of {} models",
            available.len(),
            before
        );
    }
    available
}

pub fn is_available(record: &RawModelRecord) -> bool {
    rejection(record).is_none()
}

/// First failing check, if any
pub fn rejection(record: &RawModelRecord) -> Option<Rejection> {
    let id = record.id.trim();
    if id.is_empty() {
        return Some(Rejection::BlankId);
    }
    if DENIED_MODEL_IDS
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(id))
    {
        return Some(Rejection::DeniedId);
    }
    if record.context_length.map_or(true, |c| c <= 0) {
        return Some(Rejection::MissingContext);
    }
    if record.prompt_price().is_none() && record.completion_price().is_none() {
        return Some(Rejection::MissingPricing);
    }
    if has_zero_request_limits(record) {
        return Some(Rejection::ZeroRequestLimits);
    }
    deprecation_signal(record).map(Rejection::Deprecated)
}

/// Both per-request limits present and non-positive
fn has_zero_request_limits(record: &RawModelRecord) -> bool {
    let Some(limits) = &record.per_request_limits else {
        return false;
    };

    let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<f64>().ok());
    matches!(
        (parse(&limits.prompt_tokens), parse(&limits.completion_tokens)),
        (Some(prompt), Some(completion)) if prompt <= 0.0 && completion <= 0.0
    )
}

/// Deprecation heuristic, first match wins
pub fn deprecation_signal(record: &RawModelRecord) -> Option<DeprecationSignal> {
    if record
        .architecture
        .instruct_type
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains("deprecated"))
    {
        return Some(DeprecationSignal::InstructType);
    }

    if let Some(description) = record.description.as_deref() {
        let description = description.to_lowercase();
        if DEPRECATION_PHRASES
            .iter()
            .any(|phrase| description.contains(phrase))
        {
            return Some(DeprecationSignal::Description);
        }
    }

    if is_experimental_id(&record.id) && is_strictly_free(record) {
        return Some(DeprecationSignal::ExperimentalFree);
    }

    None
}

pub fn is_deprecated(record: &RawModelRecord) -> bool {
    deprecation_signal(record).is_some()
}

/// `*-exp-MM-DD` build or anything named experimental
fn is_experimental_id(id: &str) -> bool {
    has_dated_exp_suffix(id) || id.to_lowercase().contains("experimental")
}

pub(crate) fn has_dated_exp_suffix(id: &str) -> bool {
    DATED_EXPERIMENTAL_ID
        .as_ref()
        .is_some_and(|re| re.is_match(id))
}

/// Both prices present and parse to exactly zero
fn is_strictly_free(record: &RawModelRecord) -> bool {
    let zero = |v: Option<&str>| {
        v.and_then(|s| s.trim().parse::<f64>().ok())
            .is_some_and(|p| p == 0.0)
    };
    zero(record.prompt_price()) && zero(record.completion_price())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::raw::{RawPricing, RawRequestLimits};

    fn record(id: &str, prompt: &str, completion: &str) -> RawModelRecord {
        RawModelRecord {
            id: id.to_string(),
            name: id.to_string(),
            description: Some("General purpose model".to_string()),
            pricing: Some(RawPricing {
                prompt: Some(prompt.to_string()),
                completion: Some(completion.to_string()),
            }),
            context_length: Some(32_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_records_pass_in_order() {
        let records = vec![
            record("a/one", "0.000001", "0.000002"),
            record("b/two", "0", "0"),
            record("c/three", "0.01", "0.01"),
        ];
        let kept = filter_available(records.clone());
        assert_eq!(kept, records);
    }

    #[test]
    fn test_context_length_checks() {
        let mut missing = record("a/missing", "0.1", "0.1");
        missing.context_length = None;
        let mut zero = record("a/zero", "0.1", "0.1");
        zero.context_length = Some(0);
        let mut negative = record("a/negative", "0.1", "0.1");
        negative.context_length = Some(-5);

        for r in [&missing, &zero, &negative] {
            assert_eq!(rejection(r), Some(Rejection::MissingContext));
        }

        let kept = filter_available(vec![missing, record("a/ok", "0.1", "0.1"), zero, negative]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a/ok");
    }

    #[test]
    fn test_pricing_absent_vs_zero() {
        let mut no_pricing = record("a/b", "0", "0");
        no_pricing.pricing = None;
        assert_eq!(rejection(&no_pricing), Some(Rejection::MissingPricing));

        let mut empty_pricing = record("a/b", "0", "0");
        empty_pricing.pricing = Some(RawPricing::default());
        assert_eq!(rejection(&empty_pricing), Some(Rejection::MissingPricing));

        let mut one_price = record("a/b", "0", "0");
        one_price.pricing = Some(RawPricing {
            prompt: Some("0".to_string()),
            completion: None,
        });
        assert!(is_available(&one_price));

        assert!(is_available(&record("a/b", "0", "0")));
    }

    #[test]
    fn test_request_limits() {
        let mut both_zero = record("a/b", "0.1", "0.1");
        both_zero.per_request_limits = Some(RawRequestLimits {
            prompt_tokens: Some("0".to_string()),
            completion_tokens: Some("-1".to_string()),
        });
        assert_eq!(rejection(&both_zero), Some(Rejection::ZeroRequestLimits));

        let mut one_positive = record("a/b", "0.1", "0.1");
        one_positive.per_request_limits = Some(RawRequestLimits {
            prompt_tokens: Some("0".to_string()),
            completion_tokens: Some("4096".to_string()),
        });
        assert!(is_available(&one_positive));

        let mut empty = record("a/b", "0.1", "0.1");
        empty.per_request_limits = Some(RawRequestLimits::default());
        assert!(is_available(&empty));
    }

    #[test]
    fn test_blank_and_denied_ids() {
        assert_eq!(rejection(&record("   ", "0.1", "0.1")), Some(Rejection::BlankId));
        assert_eq!(
            rejection(&record("openai/gpt-4-vision-preview", "0.1", "0.1")),
            Some(Rejection::DeniedId)
        );
        assert_eq!(
            rejection(&record("Anthropic/Claude-Instant-1", "0.1", "0.1")),
            Some(Rejection::DeniedId)
        );
    }

    #[test]
    fn test_deprecation_by_instruct_type() {
        let mut r = record("a/b", "0.1", "0.1");
        r.architecture.instruct_type = Some("DEPRECATED-alpaca".to_string());
        assert_eq!(deprecation_signal(&r), Some(DeprecationSignal::InstructType));
    }

    #[test]
    fn test_deprecation_by_description() {
        for text in [
            "This model is Deprecated.",
            "Please switch to v2",
            "No longer supported by the vendor",
            "Discontinued in 2024",
            "Replaced by gpt-4o",
        ] {
            let mut r = record("a/b", "0.1", "0.1");
            r.description = Some(text.to_string());
            assert_eq!(
                deprecation_signal(&r),
                Some(DeprecationSignal::Description),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_experimental_free_is_deprecated() {
        let dated = record("x/y-exp-03-25", "0", "0");
        assert_eq!(
            deprecation_signal(&dated),
            Some(DeprecationSignal::ExperimentalFree)
        );

        let named = record("google/gemini-experimental", "0.0", "0");
        assert!(is_deprecated(&named));
    }

    #[test]
    fn test_experimental_priced_is_kept() {
        assert!(is_available(&record("x/y-exp-03-25", "0.000001", "0")));
        assert!(is_available(&record("x/experimental-z", "0", "0.000002")));
    }

    #[test]
    fn test_experimental_unparseable_price_is_kept() {
        assert!(is_available(&record("x/y-exp-03-25", "n/a", "0")));
    }
}
