//! Filter and sort state
//!
//! Declarative inputs to the filter/sort engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::model::CostTier;

/// Which models the caller wants to see
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub selected_providers: BTreeSet<String>,
    pub selected_cost_tiers: BTreeSet<CostTier>,
    pub multimodal_only: bool,
    pub reasoning_only: bool,
    pub stream_cancel_only: bool,
    pub hide_experimental: bool,
}

/// A single explicit change to a [`FilterState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    SearchTerm(String),
    Providers(BTreeSet<String>),
    CostTiers(BTreeSet<CostTier>),
    MultimodalOnly(bool),
    ReasoningOnly(bool),
    StreamCancelOnly(bool),
    HideExperimental(bool),
}

impl FilterState {
    pub fn apply_update(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::SearchTerm(term) => self.search_term = term,
            FilterUpdate::Providers(providers) => self.selected_providers = providers,
            FilterUpdate::CostTiers(tiers) => self.selected_cost_tiers = tiers,
            FilterUpdate::MultimodalOnly(on) => self.multimodal_only = on,
            FilterUpdate::ReasoningOnly(on) => self.reasoning_only = on,
            FilterUpdate::StreamCancelOnly(on) => self.stream_cancel_only = on,
            FilterUpdate::HideExperimental(on) => self.hide_experimental = on,
        }
    }

    /// True when any predicate would narrow the collection
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty()
            || !self.selected_providers.is_empty()
            || !self.selected_cost_tiers.is_empty()
            || self.multimodal_only
            || self.reasoning_only
            || self.stream_cancel_only
            || self.hide_experimental
    }
}

/// Comparable [`ModelInfo`](crate::types::model::ModelInfo) fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Name,
    Provider,
    Description,
    CostTier,
    Context,
    InputPrice,
    OutputPrice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// No key means input order is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Same key flips the direction; a different key starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.toggled();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }
}
