//! Stateful filter/sort session
//!
//! Holds the [`FilterState`] and [`SortConfig`] a presentation layer edits,
//! exposing only explicit update operations.

use crate::engine::{self, FilteredModels};
use crate::types::filter::{FilterState, FilterUpdate, SortConfig, SortDirection, SortKey};
use crate::types::model::{CostTier, ModelInfo};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSession {
    filters: FilterState,
    sort: SortConfig,
}

impl FilterSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    pub fn update(&mut self, update: FilterUpdate) {
        self.filters.apply_update(update);
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.update(FilterUpdate::SearchTerm(term.into()));
    }

    /// Add the provider if absent, remove it if present
    pub fn toggle_provider(&mut self, provider: &str) {
        if !self.filters.selected_providers.remove(provider) {
            self.filters.selected_providers.insert(provider.to_string());
        }
    }

    pub fn toggle_cost_tier(&mut self, tier: CostTier) {
        if !self.filters.selected_cost_tiers.remove(&tier) {
            self.filters.selected_cost_tiers.insert(tier);
        }
    }

    /// Back to the default filter; sorting is left alone
    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    /// Same key toggles direction, a new key sorts ascending
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort.select(key);
    }

    /// Sort by `key` in `direction`, unless `key` is already active, which toggles it
    pub fn set_sort_with(&mut self, key: SortKey, direction: SortDirection) {
        if self.sort.key == Some(key) {
            self.sort.direction = self.sort.direction.toggled();
        } else {
            self.sort = SortConfig::by(key, direction);
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort = SortConfig::default();
    }

    pub fn apply(&self, models: &[ModelInfo]) -> FilteredModels {
        engine::apply(models, &self.filters, &self.sort)
    }
}
