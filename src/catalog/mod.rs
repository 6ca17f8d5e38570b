//! Model catalog client
//!
//! Fetches the raw listing, runs the availability filter and the classifier,
//! and keeps the result in a short-lived cache. Listing failures are absorbed:
//! the previous cache is served if there is one, otherwise the fallback list.

pub mod availability;
pub mod classify;
pub mod clock;
pub mod error;
pub mod fallback;
pub mod probe;
pub mod source;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::types::config::ChooserConfig;
use crate::types::model::ModelInfo;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CatalogError;
pub use probe::{ProbeOutcome, TokenUsage};
pub use source::{HttpModelSource, ModelSource};

/// Last successful listing; value and timestamp are always replaced together
#[derive(Debug, Clone)]
struct CacheEntry {
    models: Vec<ModelInfo>,
    fetched_at: DateTime<Utc>,
}

/// Free and paid partitions of a collection, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedModels {
    pub free_models: Vec<ModelInfo>,
    pub paid_models: Vec<ModelInfo>,
}

pub struct CatalogClient {
    source: Arc<dyn ModelSource>,
    clock: Arc<dyn Clock>,
    cache: RwLock<Option<CacheEntry>>,
    ttl: Duration,
    fallback: Option<Vec<ModelInfo>>,
    http: reqwest::Client,
    chat_endpoint: String,
}

impl CatalogClient {
    /// HTTP-backed client using the configured endpoints
    pub fn new(config: &ChooserConfig) -> Result<Self, CatalogError> {
        let source = HttpModelSource::new(
            config.api_endpoint.clone(),
            std::time::Duration::from_secs(config.request_timeout_secs),
        )?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self::build(config, Arc::new(source), Arc::new(SystemClock), http))
    }

    /// Client over an arbitrary source and clock
    pub fn with_source(
        config: &ChooserConfig,
        source: Arc<dyn ModelSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::build(config, source, clock, reqwest::Client::new())
    }

    fn build(
        config: &ChooserConfig,
        source: Arc<dyn ModelSource>,
        clock: Arc<dyn Clock>,
        http: reqwest::Client,
    ) -> Self {
        let ttl_secs = config.cache_ttl_secs.min(i64::MAX as u64 / 1000) as i64;
        Self {
            source,
            clock,
            cache: RwLock::new(None),
            ttl: Duration::seconds(ttl_secs),
            fallback: config.fallback_models.clone(),
            http,
            chat_endpoint: config.chat_endpoint.clone(),
        }
    }

    /// Return the catalog, hitting the network only when the cache is stale or
    /// `force_refresh` is set.
    pub async fn fetch_models(&self, force_refresh: bool) -> Result<Vec<ModelInfo>, CatalogError> {
        if !force_refresh {
            if let Some(models) = self.fresh_cache() {
                tracing::debug!("Serving {} models from cache", models.len());
                return Ok(models);
            }
        }

        match self.refresh_from_source().await {
            Ok(models) => Ok(models),
            Err(e) => {
                tracing::error!("Failed to fetch models from {}: {}", self.source.describe(), e);
                self.recover(e)
            }
        }
    }

    async fn refresh_from_source(&self) -> Result<Vec<ModelInfo>, CatalogError> {
        let raw = self.source.fetch_raw().await?;
        let received = raw.len();

        let models: Vec<ModelInfo> = availability::filter_available(raw)
            .iter()
            .map(classify::classify)
            .collect();

        tracing::info!(
            "Fetched {} models ({} usable) from {}",
            received,
            models.len(),
            self.source.describe()
        );

        let entry = CacheEntry {
            models: models.clone(),
            fetched_at: self.clock.now(),
        };
        *self
            .cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(entry);

        Ok(models)
    }

    /// Previous cache, then configured or built-in fallback
    fn recover(&self, error: CatalogError) -> Result<Vec<ModelInfo>, CatalogError> {
        if let Some(models) = self.cached_models() {
            tracing::warn!("Using {} cached models after fetch failure", models.len());
            return Ok(models);
        }

        match &self.fallback {
            None => {
                tracing::warn!("Using built-in fallback models");
                Ok(fallback::builtin_models())
            }
            Some(models) if !models.is_empty() => {
                tracing::warn!("Using {} configured fallback models", models.len());
                Ok(models.clone())
            }
            Some(_) => Err(error),
        }
    }

    fn fresh_cache(&self) -> Option<Vec<ModelInfo>> {
        let cache = self
            .cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        cache
            .as_ref()
            .filter(|entry| self.clock.now() - entry.fetched_at < self.ttl)
            .map(|entry| entry.models.clone())
    }

    /// Cached models regardless of age
    pub fn cached_models(&self) -> Option<Vec<ModelInfo>> {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map(|entry| entry.models.clone())
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map(|entry| entry.fetched_at)
    }

    pub fn is_cache_fresh(&self) -> bool {
        self.fresh_cache().is_some()
    }

    pub fn clear_cache(&self) {
        *self
            .cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }

    /// Split on `free` versus every other tier
    pub fn categorize_models(models: &[ModelInfo]) -> CategorizedModels {
        let (free_models, paid_models) = models
            .iter()
            .cloned()
            .partition(|model| model.cost_tier.is_free());
        CategorizedModels {
            free_models,
            paid_models,
        }
    }

    /// Send one completion request to `model_id` with the caller's credential.
    ///
    /// A missing credential fails immediately without touching the network.
    pub async fn test_model(
        &self,
        model_id: &str,
        credential: Option<&str>,
        message: Option<&str>,
    ) -> ProbeOutcome {
        probe::send_probe(&self.http, &self.chat_endpoint, model_id, credential, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::model::CostTier;
    use crate::types::raw::{RawModelRecord, RawPricing};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted source: pops one result per call, counting calls
    struct ScriptedSource {
        results: Mutex<Vec<Result<Vec<RawModelRecord>, CatalogError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(mut results: Vec<Result<Vec<RawModelRecord>, CatalogError>>) -> Arc<Self> {
            results.reverse();
            Arc::new(Self {
                results: Mutex::new(results),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelSource for ScriptedSource {
        async fn fetch_raw(&self) -> Result<Vec<RawModelRecord>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(CatalogError::Http { status: 503 }))
        }

        fn describe(&self) -> &str {
            "scripted"
        }
    }

    fn raw(id: &str, prompt: &str, completion: &str) -> RawModelRecord {
        RawModelRecord {
            id: id.to_string(),
            name: id.to_string(),
            description: Some("test".to_string()),
            pricing: Some(RawPricing {
                prompt: Some(prompt.to_string()),
                completion: Some(completion.to_string()),
            }),
            context_length: Some(4096),
            ..Default::default()
        }
    }

    fn client(source: Arc<ScriptedSource>, clock: Arc<ManualClock>) -> CatalogClient {
        CatalogClient::with_source(&ChooserConfig::default(), source, clock)
    }

    #[tokio::test]
    async fn test_fetch_filters_and_classifies() {
        let source = ScriptedSource::new(vec![Ok(vec![
            raw("openai/gpt-4o", "0.0000025", "0.00001"),
            raw("x/y-exp-03-25", "0", "0"),
            raw("meta/llama:free", "0", "0"),
        ])]);
        let client = client(source.clone(), Arc::new(ManualClock::default()));

        let models = client.fetch_models(false).await.unwrap();
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["openai/gpt-4o", "meta/llama:free"]);
        assert_eq!(models[0].provider, "Openai");
        assert_eq!(models[1].cost_tier, CostTier::Free);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_window() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("a/one", "0.1", "0.1")]),
            Ok(vec![raw("a/two", "0.1", "0.1")]),
        ]);
        let clock = Arc::new(ManualClock::default());
        let client = client(source.clone(), clock.clone());

        assert_eq!(client.fetch_models(false).await.unwrap()[0].id, "a/one");

        clock.advance(Duration::seconds(299));
        assert_eq!(client.fetch_models(false).await.unwrap()[0].id, "a/one");
        assert_eq!(source.calls(), 1);
        assert!(client.is_cache_fresh());

        clock.advance(Duration::seconds(1));
        assert!(!client.is_cache_fresh());
        assert_eq!(client.fetch_models(false).await.unwrap()[0].id, "a/two");
        assert_eq!(source.calls(), 2);
        assert_eq!(client.last_fetched_at(), Some(clock.now()));
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_cache() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("a/one", "0.1", "0.1")]),
            Ok(vec![raw("a/two", "0.1", "0.1")]),
        ]);
        let client = client(source.clone(), Arc::new(ManualClock::default()));

        client.fetch_models(false).await.unwrap();
        let models = client.fetch_models(true).await.unwrap();
        assert_eq!(models[0].id, "a/two");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_serves_previous_cache() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("a/one", "0.1", "0.1")]),
            Err(CatalogError::Http { status: 500 }),
        ]);
        let client = client(source.clone(), Arc::new(ManualClock::default()));

        client.fetch_models(false).await.unwrap();
        let models = client.fetch_models(true).await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "a/one");
    }

    #[tokio::test]
    async fn test_failure_without_cache_uses_builtin_fallback() {
        let source = ScriptedSource::new(vec![Err(CatalogError::Http { status: 502 })]);
        let client = client(source, Arc::new(ManualClock::default()));

        let models = client.fetch_models(false).await.unwrap();
        assert_eq!(models, fallback::builtin_models());
        assert!(client.cached_models().is_none());
    }

    #[tokio::test]
    async fn test_configured_fallback_and_empty_fallback() {
        let custom = fallback::builtin_models().into_iter().take(1).collect::<Vec<_>>();
        let config = ChooserConfig::default().with_fallback_models(custom.clone());
        let source = ScriptedSource::new(vec![Err(CatalogError::Http { status: 500 })]);
        let client = CatalogClient::with_source(&config, source, Arc::new(ManualClock::default()));
        assert_eq!(client.fetch_models(false).await.unwrap(), custom);

        let config = ChooserConfig::default().with_fallback_models(Vec::new());
        let source = ScriptedSource::new(vec![Err(CatalogError::Http { status: 500 })]);
        let client = CatalogClient::with_source(&config, source, Arc::new(ManualClock::default()));
        let err = client.fetch_models(false).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("a/one", "0.1", "0.1")]),
            Ok(vec![raw("a/two", "0.1", "0.1")]),
        ]);
        let client = client(source.clone(), Arc::new(ManualClock::default()));

        client.fetch_models(false).await.unwrap();
        client.clear_cache();
        assert!(client.cached_models().is_none());
        assert!(client.last_fetched_at().is_none());

        assert_eq!(client.fetch_models(false).await.unwrap()[0].id, "a/two");
    }

    #[test]
    fn test_categorize_models() {
        let models = fallback::builtin_models();
        let split = CatalogClient::categorize_models(&models);

        assert_eq!(split.free_models.len() + split.paid_models.len(), models.len());
        assert!(split.free_models.iter().all(|m| m.cost_tier == CostTier::Free));
        assert!(split.paid_models.iter().all(|m| m.cost_tier != CostTier::Free));
        assert!(split
            .free_models
            .iter()
            .all(|f| !split.paid_models.iter().any(|p| p.id == f.id)));

        let paid_ids: Vec<&str> = split.paid_models.iter().map(|m| m.id.as_str()).collect();
        let expected: Vec<&str> = models
            .iter()
            .filter(|m| m.cost_tier != CostTier::Free)
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(paid_ids, expected);
    }
}
