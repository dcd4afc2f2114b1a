//! TLD policy source
//!
//! Answers the per-TLD questions the engine asks before issuing an order:
//! does this process need documentation, may contacts be updated at all,
//! can the registrar act as local presence. Answers come from the TLD
//! catalog through a [`PolicyCache`]; an entry is refetched once it is
//! older than the configured maximum age.
//!
//! Cache and catalog failures are returned to the caller unchanged. The
//! engine treats them as a block, never as "no requirement".

use chrono::Utc;
use tracing::{debug, info};

use crate::config::{Credentials, tld_of};
use crate::error::Result;
use crate::traits::{OrderType, PolicyCache, TldCatalog, TldInfo};

/// Default maximum age of a cached catalog entry in whole days
pub const DEFAULT_MAX_AGE_DAYS: i64 = 180;

/// Procedure fragments meaning a TLD does not allow contact updates
const CONTACT_UPDATE_BLOCKERS: [&str; 3] = [
    "not permitted",
    "not supported",
    "Contact roles does not exist",
];

/// Policy answers for one (TLD, order type) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyGateResult {
    pub documentation_required: bool,
    pub contacts_permitted: bool,
    pub local_presence_offered: bool,
}

impl PolicyGateResult {
    /// Derive the gate answers for an order type from a catalog entry
    pub fn from_info(info: &TldInfo, action: OrderType) -> Self {
        let documentation_required = info
            .process(action.catalog_command())
            .and_then(|p| p.documentation_required)
            .unwrap_or(false);

        let contacts_permitted = info
            .process(OrderType::ContactUpdate.catalog_command())
            .and_then(|p| p.procedure.as_deref())
            .is_none_or(|procedure| {
                !CONTACT_UPDATE_BLOCKERS
                    .iter()
                    .any(|blocker| procedure.contains(blocker))
            });

        Self {
            documentation_required,
            contacts_permitted,
            local_presence_offered: info.local_presence_offered,
        }
    }
}

/// Cached view of the TLD catalog
pub struct TldPolicySource {
    catalog: Box<dyn TldCatalog>,
    cache: Box<dyn PolicyCache>,
    max_age_days: i64,
}

impl TldPolicySource {
    /// Create a policy source with the default maximum age
    pub fn new(catalog: Box<dyn TldCatalog>, cache: Box<dyn PolicyCache>) -> Self {
        Self {
            catalog,
            cache,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }

    /// Override the maximum entry age
    pub fn with_max_age_days(mut self, max_age_days: i64) -> Self {
        self.max_age_days = max_age_days;
        self
    }

    /// Maximum entry age in whole days
    pub fn max_age_days(&self) -> i64 {
        self.max_age_days
    }

    /// Gate answers for `action` on the TLD of `domain`
    pub async fn get(
        &self,
        credentials: &Credentials,
        domain: &str,
        action: OrderType,
    ) -> Result<PolicyGateResult> {
        let info = self.info(credentials, tld_of(domain)).await?;
        let result = PolicyGateResult::from_info(&info, action);
        debug!(domain, action = action.catalog_command(), ?result, "Policy lookup");
        Ok(result)
    }

    /// Whether `action` needs documentation on the TLD of `domain`
    pub async fn docs_required(
        &self,
        credentials: &Credentials,
        domain: &str,
        action: OrderType,
    ) -> Result<bool> {
        Ok(self.get(credentials, domain, action).await?.documentation_required)
    }

    /// Whether the TLD of `domain` allows contact updates
    pub async fn contacts_permitted(&self, credentials: &Credentials, domain: &str) -> Result<bool> {
        Ok(self
            .get(credentials, domain, OrderType::ContactUpdate)
            .await?
            .contacts_permitted)
    }

    /// Whether the registrar offers local presence for the TLD of `domain`
    pub async fn local_presence_offered(&self, credentials: &Credentials, domain: &str) -> Result<bool> {
        let info = self.info(credentials, tld_of(domain)).await?;
        Ok(info.local_presence_offered)
    }

    /// Catalog entry for a TLD, from cache while fresh
    pub async fn info(&self, credentials: &Credentials, tld: &str) -> Result<TldInfo> {
        let tld = tld.to_ascii_lowercase();

        if let Some(entry) = self.cache.get(&tld).await? {
            if !entry.is_stale(Utc::now(), self.max_age_days) {
                return Ok(entry.info);
            }
            debug!(
                "Cached catalog entry for .{} is {} days old, refetching",
                tld,
                entry.age_days(Utc::now())
            );
        }

        let info = self.catalog.fetch_tld(credentials, &tld).await?;
        info!(
            "Fetched catalog entry for .{} from {}",
            tld,
            self.catalog.catalog_name()
        );
        self.cache.put(&tld, &info).await?;
        Ok(info)
    }
}
