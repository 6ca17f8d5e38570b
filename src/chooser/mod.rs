//! Chooser session
//!
//! The state a presentation layer drives: load status, the current catalog and
//! its free/paid partitions, the filter session and the selected model.
//! Selection changes are pushed to registered listeners.

use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{CatalogClient, CatalogError, CategorizedModels, ProbeOutcome};
use crate::engine::{self, FilterSession, FilteredModels};
use crate::types::config::ChooserConfig;
use crate::types::model::ModelInfo;

/// Represents where the catalog load currently stands
#[derive(Clone, PartialEq, Debug)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded(usize),
    Error(String),
}

#[derive(Debug, Error)]
pub enum ChooserError {
    #[error("Model not found: {0}")]
    UnknownModel(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Holds `Loading` for the duration of a fetch and restores the prior state
/// if the fetch is abandoned.
struct LoadGuard<'a> {
    state: &'a mut LoadState,
    previous: Option<LoadState>,
}

impl<'a> LoadGuard<'a> {
    fn begin(state: &'a mut LoadState) -> Self {
        let previous = std::mem::replace(state, LoadState::Loading);
        Self {
            state,
            previous: Some(previous),
        }
    }

    fn disarm(mut self) {
        self.previous = None;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::debug!("Model load cancelled, restoring {:?}", previous);
            *self.state = previous;
        }
    }
}

type ChangeListener = Arc<dyn Fn(&str) + Send + Sync>;
type SelectListener = Arc<dyn Fn(&ModelInfo) + Send + Sync>;

pub struct ModelChooser {
    catalog: CatalogClient,
    config: ChooserConfig,
    state: LoadState,
    models: Vec<ModelInfo>,
    partitions: Option<CategorizedModels>,
    session: FilterSession,
    selected: Option<String>,
    change_listeners: DashMap<Uuid, ChangeListener>,
    select_listeners: DashMap<Uuid, SelectListener>,
}

impl ModelChooser {
    pub fn new(config: ChooserConfig) -> Result<Self, ChooserError> {
        let catalog = CatalogClient::new(&config)?;
        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: ChooserConfig, catalog: CatalogClient) -> Self {
        tracing::debug!("Chooser initialized for {}", config.api_endpoint);
        Self {
            catalog,
            config,
            state: LoadState::NotLoaded,
            models: Vec::new(),
            partitions: None,
            session: FilterSession::new(),
            selected: None,
            change_listeners: DashMap::new(),
            select_listeners: DashMap::new(),
        }
    }

    /// Load the catalog; on failure the previously loaded models stay visible.
    ///
    /// Dropping the returned future before it completes puts the state back
    /// to what it was before the call.
    pub async fn load(&mut self, force_refresh: bool) -> &LoadState {
        let guard = LoadGuard::begin(&mut self.state);
        let result = self.catalog.fetch_models(force_refresh).await;
        guard.disarm();

        self.finish_load(result)
    }

    /// Mark a load as running, for callers that drive the fetch themselves
    /// through [`ModelChooser::catalog`] and report back with
    /// [`ModelChooser::finish_load`].
    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Record the outcome of a fetch started with [`ModelChooser::begin_load`]
    pub fn finish_load(&mut self, result: Result<Vec<ModelInfo>, CatalogError>) -> &LoadState {
        match result {
            Ok(models) => {
                self.partitions = self
                    .config
                    .categorize
                    .then(|| CatalogClient::categorize_models(&models));
                self.state = LoadState::Loaded(models.len());
                self.models = models;
            }
            Err(e) => {
                tracing::error!("Failed to load models: {}", e);
                self.state = LoadState::Error(e.to_string());
            }
        }

        &self.state
    }

    /// Forced reload, bypassing the cache
    pub async fn refresh(&mut self) -> &LoadState {
        self.load(true).await
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn config(&self) -> &ChooserConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    /// Empty unless `categorize` is enabled
    pub fn free_models(&self) -> &[ModelInfo] {
        self.partitions
            .as_ref()
            .map(|p| p.free_models.as_slice())
            .unwrap_or_default()
    }

    /// Empty unless `categorize` is enabled
    pub fn paid_models(&self) -> &[ModelInfo] {
        self.partitions
            .as_ref()
            .map(|p| p.paid_models.as_slice())
            .unwrap_or_default()
    }

    pub fn session(&self) -> &FilterSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FilterSession {
        &mut self.session
    }

    /// Visible models under the current filters and sort
    pub fn view(&self) -> FilteredModels {
        self.session.apply(&self.models)
    }

    /// Providers for building filter controls, from the unfiltered catalog
    pub fn available_providers(&self) -> Vec<String> {
        engine::available_providers(&self.models)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_model(&self) -> Option<&ModelInfo> {
        let id = self.selected.as_deref()?;
        self.models.iter().find(|m| m.id == id)
    }

    /// Select a loaded model by id and notify listeners
    pub fn select(&mut self, model_id: &str) -> Result<(), ChooserError> {
        let model = self
            .models
            .iter()
            .find(|m| m.id == model_id)
            .cloned()
            .ok_or_else(|| ChooserError::UnknownModel(model_id.to_string()))?;

        tracing::info!("Selected model {}", model.id);
        self.selected = Some(model.id.clone());

        // Collect first so listeners can (un)subscribe without deadlocking the map.
        let change: Vec<ChangeListener> =
            self.change_listeners.iter().map(|e| e.value().clone()).collect();
        for listener in change {
            listener(&model.id);
        }

        let select: Vec<SelectListener> =
            self.select_listeners.iter().map(|e| e.value().clone()).collect();
        for listener in select {
            listener(&model);
        }

        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Called with the verbatim id of every newly selected model
    pub fn on_model_change(&self, listener: impl Fn(&str) + Send + Sync + 'static) -> Uuid {
        let id = Uuid::new_v4();
        self.change_listeners.insert(id, Arc::new(listener));
        id
    }

    /// Called with the full descriptor of every newly selected model
    pub fn on_model_select(&self, listener: impl Fn(&ModelInfo) + Send + Sync + 'static) -> Uuid {
        let id = Uuid::new_v4();
        self.select_listeners.insert(id, Arc::new(listener));
        id
    }

    /// Returns false when `subscription` was not registered
    pub fn unsubscribe(&self, subscription: Uuid) -> bool {
        self.change_listeners.remove(&subscription).is_some()
            || self.select_listeners.remove(&subscription).is_some()
    }

    /// Probe `model_id` through the catalog's completion endpoint
    pub async fn test_model(
        &self,
        model_id: &str,
        credential: Option<&str>,
        message: Option<&str>,
    ) -> ProbeOutcome {
        self.catalog.test_model(model_id, credential, message).await
    }
}
