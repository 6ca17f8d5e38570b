//! Model Chooser Library
//!
//! Fetches an OpenRouter-compatible model listing, drops unusable entries,
//! classifies the rest into [`ModelInfo`] descriptors and filters/sorts them
//! for a picker UI.
//!
//! Reasoning and stream-cancel flags are best-effort heuristics backed by
//! maintained tables in [`catalog::classify`]; they are not authoritative.

pub mod catalog;
pub mod chooser;
pub mod engine;
pub mod format;
pub mod logging;
pub mod types;

pub use catalog::{CatalogClient, CatalogError, CategorizedModels, ProbeOutcome, TokenUsage};
pub use chooser::{ChooserError, LoadState, ModelChooser};
pub use engine::{FilterSession, FilterStats, FilteredModels};
pub use logging::init_logging;
pub use types::config::{ChooserConfig, ConfigError, Theme};
pub use types::filter::{FilterState, FilterUpdate, SortConfig, SortDirection, SortKey};
pub use types::model::{CostTier, ModelInfo, Pricing};
pub use types::raw::RawModelRecord;
