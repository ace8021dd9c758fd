//! HTTP client for fetching GetCapabilities documents.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::CapabilitiesError;

/// Client for a single WMS GetCapabilities endpoint.
///
/// Carries no retry policy: the periodic refresh loop simply tries
/// again on its next tick.
#[derive(Debug, Clone)]
pub struct CapabilitiesClient {
    client: Client,
    url: String,
}

impl CapabilitiesClient {
    /// Create a client for the given GetCapabilities URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CapabilitiesError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the capabilities XML as text.
    pub async fn fetch(&self) -> Result<String, CapabilitiesError> {
        debug!(url = %self.url, "Fetching capabilities");
        let response = self.client.get(&self.url).send().await?;
        let xml = response.error_for_status()?.text().await?;
        debug!(bytes = xml.len(), "Fetched capabilities document");
        Ok(xml)
    }
}
