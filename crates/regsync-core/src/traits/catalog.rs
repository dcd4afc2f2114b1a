// # TLD Catalog Trait
//
// Defines the interface for looking up per-TLD registry policy.
//
// The catalog answers which processes a TLD supports, whether each needs
// manual documentation, and whether the registrar can act as local
// presence. Lookups are slow and change rarely, so the engine only ever
// reaches the catalog through `TldPolicySource`, which caches per TLD.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Credentials;

/// One process (order type) as described by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TldProcess {
    /// Process name, e.g. `REGISTER` or `CONTACT UPDATE`
    pub command: String,
    /// Whether proof-of-identity must be supplied manually
    #[serde(default)]
    pub documentation_required: Option<bool>,
    /// Free-text procedure description
    #[serde(default)]
    pub procedure: Option<String>,
}

/// Catalog entry for one TLD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TldInfo {
    #[serde(default)]
    pub processes: Vec<TldProcess>,
    #[serde(default)]
    pub local_presence_offered: bool,
    #[serde(default)]
    pub local_presence_required: bool,
}

impl TldInfo {
    /// Process entry for a catalog command
    pub fn process(&self, command: &str) -> Option<&TldProcess> {
        self.processes.iter().find(|p| p.command == command)
    }
}

/// Trait for TLD catalog implementations
#[async_trait]
pub trait TldCatalog: Send + Sync {
    /// Fetch the current catalog entry for a TLD (no caching)
    async fn fetch_tld(&self, credentials: &Credentials, tld: &str) -> Result<TldInfo, crate::Error>;

    /// Get the catalog name (for logging/debugging)
    fn catalog_name(&self) -> &'static str;
}
