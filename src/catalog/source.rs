//! Where raw listings come from

use async_trait::async_trait;
use std::time::Duration;

use crate::catalog::error::CatalogError;
use crate::types::raw::{ModelListResponse, RawModelRecord};

/// Produces one raw listing per call
#[async_trait]
pub trait ModelSource: Send + Sync {
    async fn fetch_raw(&self) -> Result<Vec<RawModelRecord>, CatalogError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> &str;
}

/// `GET <endpoint>` returning `{ "data": [...] }`
pub struct HttpModelSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpModelSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("model-chooser/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ModelSource for HttpModelSource {
    async fn fetch_raw(&self) -> Result<Vec<RawModelRecord>, CatalogError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let listing: ModelListResponse = serde_json::from_str(&body)?;
        Ok(listing.data)
    }

    fn describe(&self) -> &str {
        &self.endpoint
    }
}
