//! Catalog errors

use thiserror::Error;

/// Failures while fetching the model listing
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse model listing: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    /// HTTP status carried by the error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Http { status } => Some(*status),
            CatalogError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
