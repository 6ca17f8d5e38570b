//! Filter/sort engine
//!
//! Pure functions over a normalized collection. The same inputs always produce
//! the same output; nothing here holds state.

pub mod session;

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::catalog::availability::has_dated_exp_suffix;
use crate::types::filter::{FilterState, SortConfig, SortDirection, SortKey};
use crate::types::model::ModelInfo;

pub use session::FilterSession;

/// Size of the collection before and after filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total: usize,
    pub filtered: usize,
}

/// Visible subset plus statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredModels {
    pub result: Vec<ModelInfo>,
    pub stats: FilterStats,
}

/// Filter then sort `models`
pub fn apply(models: &[ModelInfo], filters: &FilterState, sort: &SortConfig) -> FilteredModels {
    let search = filters.search_term.to_lowercase();

    let mut result: Vec<ModelInfo> = models
        .iter()
        .filter(|model| matches_filters(model, filters, &search))
        .cloned()
        .collect();

    if let Some(key) = sort.key {
        // `sort_by` is stable, so ties keep their input order.
        result.sort_by(|a, b| compare_models(a, b, key, sort.direction));
    }

    let stats = FilterStats {
        total: models.len(),
        filtered: result.len(),
    };
    FilteredModels { result, stats }
}

fn matches_filters(model: &ModelInfo, filters: &FilterState, search: &str) -> bool {
    if !search.is_empty() && !matches_search(model, search) {
        return false;
    }
    if !filters.selected_providers.is_empty()
        && !filters.selected_providers.contains(&model.provider)
    {
        return false;
    }
    if !filters.selected_cost_tiers.is_empty()
        && !filters.selected_cost_tiers.contains(&model.cost_tier)
    {
        return false;
    }
    if filters.multimodal_only && !model.multimodal {
        return false;
    }
    if filters.reasoning_only && !model.reasoning {
        return false;
    }
    if filters.stream_cancel_only && !model.stream_cancel {
        return false;
    }
    if filters.hide_experimental && is_experimental(model) {
        return false;
    }
    true
}

/// `search` must already be lower-cased
fn matches_search(model: &ModelInfo, search: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(search);
    hit(&model.name)
        || hit(&model.provider)
        || hit(&model.description)
        || hit(&model.id)
        || model.features.iter().any(|tag| hit(tag))
}

/// Loose "experimental" check used only for hiding models in the view.
///
/// Unlike the fetch-time deprecation rule this ignores pricing and also
/// catches preview, beta, alpha and test builds.
pub fn is_experimental(model: &ModelInfo) -> bool {
    const ID_MARKERS: [&str; 5] = ["experimental", "-preview", "-beta", "-alpha", "-test"];
    const TEXT_MARKERS: [&str; 3] = ["experimental", "preview", "beta"];

    let id = model.id.to_lowercase();
    if has_dated_exp_suffix(&id) || ID_MARKERS.iter().any(|m| id.contains(m)) {
        return true;
    }

    let name = model.name.to_lowercase();
    let description = model.description.to_lowercase();
    TEXT_MARKERS
        .iter()
        .any(|m| name.contains(m) || description.contains(m))
}

/// Distinct providers of the unfiltered collection, sorted
pub fn available_providers(models: &[ModelInfo]) -> Vec<String> {
    models
        .iter()
        .map(|m| m.provider.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

fn sort_value(model: &ModelInfo, key: SortKey) -> Option<SortValue<'_>> {
    match key {
        SortKey::Id => Some(SortValue::Text(&model.id)),
        SortKey::Name => Some(SortValue::Text(&model.name)),
        SortKey::Provider => Some(SortValue::Text(&model.provider)),
        SortKey::Description => Some(SortValue::Text(&model.description)),
        SortKey::CostTier => Some(SortValue::Number(model.cost_tier as u8 as f64)),
        SortKey::Context => model.context.map(|c| SortValue::Number(c as f64)),
        SortKey::InputPrice => model.pricing.as_ref().map(|p| SortValue::Number(p.input)),
        SortKey::OutputPrice => model.pricing.as_ref().map(|p| SortValue::Number(p.output)),
    }
}

/// Models lacking the field go last whatever the direction.
pub fn compare_models(a: &ModelInfo, b: &ModelInfo, key: SortKey, direction: SortDirection) -> Ordering {
    let ordering = match (sort_value(a, key), sort_value(b, key)) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(SortValue::Text(x)), Some(SortValue::Text(y))) => locale_cmp(x, y),
        (Some(SortValue::Number(x)), Some(SortValue::Number(y))) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        // A key always yields the same variant for every model.
        _ => Ordering::Equal,
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Case-insensitive first, then lower case before upper case on ties.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
