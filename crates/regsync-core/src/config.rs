//! Configuration types for regsync
//!
//! This module defines the desired-state document the engine converges
//! towards, the registrar credentials, and the policy cache settings.

use serde::{Deserialize, Serialize};

use crate::model::{Contact, ContactRole, NameServers};

/// Fewest nameservers a domain may be delegated to
pub const MIN_NAMESERVERS: usize = 2;

/// Most nameservers a domain may be delegated to
pub const MAX_NAMESERVERS: usize = 13;

/// Registrar account credentials
///
/// The Debug implementation does NOT expose the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub user: String,
    /// Account password
    /// ⚠️ NEVER log this value
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.user.is_empty() {
            return Err(crate::Error::config("Registrar user cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(crate::Error::config("Registrar password cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Whether a run only observes or also converges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Fetch, diff and price; never mutate
    Check,
    /// Check, then issue the orders needed to converge
    Apply,
}

/// Policy flags steering what a run may do
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyFlags {
    /// Allow registering domains priced as premium
    #[serde(rename = "premium", default)]
    pub premium_allowed: bool,

    /// Highest registration price accepted
    #[serde(default)]
    pub max_price: Option<f64>,

    /// Hide contact data in WHOIS where the TLD supports it
    #[serde(rename = "whois_hide", default)]
    pub hide_whois: bool,

    /// Only converge nameservers, leave contacts alone
    #[serde(rename = "update_only_ns", default)]
    pub update_nameservers_only: bool,

    /// Proceed even when the TLD requires documentation
    #[serde(default)]
    pub force: bool,

    /// Use the registrar as local presence where offered
    #[serde(rename = "lp", default)]
    pub allow_local_presence: bool,
}

/// Desired registration state for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredConfig {
    /// Domain name; IDNA-encoded by [`DesiredConfig::normalized`]
    pub domain: String,

    /// Ordered nameserver host names
    pub nameservers: Vec<String>,

    pub contact_owner: Contact,
    pub contact_admin: Contact,
    pub contact_tech: Contact,
    pub contact_billing: Contact,

    #[serde(flatten)]
    pub flags: PolicyFlags,
}

impl DesiredConfig {
    /// Validate and bring the config into the form the engine compares
    ///
    /// - nameserver count must be within [2, 13]
    /// - the domain is converted to its ASCII-compatible encoding
    /// - a single trailing dot is dropped from nameserver names
    pub fn normalized(&self) -> Result<Self, crate::Error> {
        self.validate()?;

        let domain = idna::domain_to_ascii(self.domain.trim()).map_err(|e| {
            crate::Error::validation(format!("Domain '{}' is not a valid IDN: {:?}", self.domain, e))
        })?;

        let nameservers = self
            .nameservers
            .iter()
            .map(|ns| ns.trim().strip_suffix('.').unwrap_or(ns.trim()).to_string())
            .collect();

        Ok(Self {
            domain,
            nameservers,
            ..self.clone()
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        let count = self.nameservers.len();
        if !(MIN_NAMESERVERS..=MAX_NAMESERVERS).contains(&count) {
            return Err(crate::Error::validation(format!(
                "You need to supply between {} and {} nameservers for the domain! Got: {}",
                MIN_NAMESERVERS, MAX_NAMESERVERS, count
            )));
        }

        if let Some(empty) = self.nameservers.iter().position(|ns| ns.trim().is_empty()) {
            return Err(crate::Error::validation(format!(
                "Nameserver {} is empty",
                empty + 1
            )));
        }

        let domain = self.domain.trim();
        if domain.is_empty() {
            return Err(crate::Error::validation("Domain name cannot be empty"));
        }
        if !domain.contains('.') || domain.ends_with('.') {
            return Err(crate::Error::validation(format!(
                "Domain name '{}' has no top-level domain",
                domain
            )));
        }

        if let Some(max_price) = self.flags.max_price
            && (max_price.is_nan() || max_price < 0.0)
        {
            return Err(crate::Error::validation(format!(
                "max_price must be a non-negative number. Got: {}",
                max_price
            )));
        }

        Ok(())
    }

    /// Top-level domain (text after the last dot)
    pub fn tld(&self) -> &str {
        tld_of(&self.domain)
    }

    /// Nameservers in the registrar's positional shape
    pub fn name_servers(&self) -> NameServers {
        NameServers::from_hosts(&self.nameservers)
    }

    /// Desired contact for a role
    pub fn contact(&self, role: ContactRole) -> &Contact {
        match role {
            ContactRole::Owner => &self.contact_owner,
            ContactRole::Admin => &self.contact_admin,
            ContactRole::Tech => &self.contact_tech,
            ContactRole::Billing => &self.contact_billing,
        }
    }
}

/// Top-level domain of a domain name
pub fn tld_of(domain: &str) -> &str {
    domain.rsplit_once('.').map(|(_, tld)| tld).unwrap_or(domain)
}

/// Policy cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyCacheConfig {
    /// Where cached catalog entries live
    #[serde(default)]
    pub store: PolicyCacheStore,

    /// Entries older than this many whole days are refetched
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

impl Default for PolicyCacheConfig {
    fn default() -> Self {
        Self {
            store: PolicyCacheStore::default(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl PolicyCacheConfig {
    /// Validate the cache configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_age_days < 0 {
            return Err(crate::Error::config("Policy cache max age cannot be negative"));
        }
        if let PolicyCacheStore::File { dir } = &self.store
            && dir.is_empty()
        {
            return Err(crate::Error::config("Policy cache directory cannot be empty"));
        }
        Ok(())
    }
}

/// Backing store for the policy cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyCacheStore {
    /// One JSON file per TLD in a directory
    File {
        /// Cache directory
        dir: String,
    },

    /// In-memory cache (not persistent)
    #[default]
    Memory,
}

fn default_max_age_days() -> i64 {
    180
}
