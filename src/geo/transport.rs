//! JSON transport
//!
//! Performs a single GET with query parameters and decodes the body as JSON.
//! Geocoders talk to the network only through [`JsonFetcher`].

use crate::constants::api::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Query parameters, in the order they are sent
pub type QueryParams = Vec<(String, String)>;

/// Fetches a JSON document from a URL
pub trait JsonFetcher: Send + Sync {
    /// GET `url` with `params` appended as a query string
    fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the crate User-Agent and default timeout
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Geocoding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl JsonFetcher for HttpFetcher {
    async fn get_json(&self, url: &str, params: &[(String, String)]) -> Result<Value> {
        debug!(url, ?params, "GET");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "{} returned status: {}",
                url,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse response from {}: {}", url, e)))
    }
}
