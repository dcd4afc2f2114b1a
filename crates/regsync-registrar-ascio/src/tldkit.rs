// # TLDKit Catalog
//
// TLD catalog backed by the ASCIO TLDKit REST API.
//
// One GET per lookup, authenticated with the registrar account via HTTP
// basic auth. No caching here: `TldPolicySource` owns the cache.
//
// ## API Reference
//
// - `GET https://tldkit.ascio.com/api/v1/Tldkit/<tld>`
// - Answer: `{"Processes": [{"Command": ..., "DocumentationRequired": ...,
//   "Procedure": ...}], "LocalPresenceOffered": ..., "LocalPresenceRequired": ...}`

use std::time::Duration;

use async_trait::async_trait;
use regsync_core::traits::{TldCatalog, TldInfo};
use regsync_core::{Credentials, Error, Result};

/// Production base URL of the catalog
pub const TLDKIT_BASE_URL: &str = "https://tldkit.ascio.com/api/v1/Tldkit";

/// Default HTTP timeout for catalog lookups (90 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(90);

/// TLDKit catalog client
#[derive(Debug)]
pub struct TldKitCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl TldKitCatalog {
    /// Create a catalog client for a base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("Catalog base URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    /// Catalog client for the production API
    pub fn production() -> Result<Self> {
        Self::new(TLDKIT_BASE_URL)
    }

    /// Base URL lookups are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TldCatalog for TldKitCatalog {
    async fn fetch_tld(&self, credentials: &Credentials, tld: &str) -> Result<TldInfo> {
        let url = format!("{}/{}", self.base_url, tld);
        tracing::debug!("Fetching TLD policy for .{}", tld);

        let response = self
            .client
            .get(&url)
            .basic_auth(&credentials.user, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| Error::catalog(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return match status.as_u16() {
                401 | 403 => Err(Error::catalog(format!(
                    "Authentication failed: catalog refused the account. Status: {}",
                    status
                ))),
                404 => Err(Error::catalog(format!("TLD not in catalog: {}", tld))),
                429 => Err(Error::catalog(format!(
                    "Rate limit exceeded. Please retry later. Status: {}",
                    status
                ))),
                500..=599 => Err(Error::catalog(format!(
                    "Catalog server error (transient): {} - {}",
                    status, error_text
                ))),
                _ => Err(Error::catalog(format!(
                    "TLD lookup failed: {} - {}",
                    status, error_text
                ))),
            };
        }

        response
            .json::<TldInfo>()
            .await
            .map_err(|e| Error::catalog(format!("Failed to parse response: {}", e)))
    }

    fn catalog_name(&self) -> &'static str {
        "tldkit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_trimmed() {
        let catalog = TldKitCatalog::new("http://localhost:1234/api/").unwrap();
        assert_eq!(catalog.base_url(), "http://localhost:1234/api");
    }

    #[test]
    fn empty_base_url_rejected() {
        assert!(TldKitCatalog::new("/").is_err());
    }

    #[test]
    fn production_catalog() {
        let catalog = TldKitCatalog::production().unwrap();
        assert_eq!(catalog.base_url(), TLDKIT_BASE_URL);
        assert_eq!(catalog.catalog_name(), "tldkit");
    }
}
