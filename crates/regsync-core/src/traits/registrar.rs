// # Registrar Client Trait
//
// Defines the interface for talking to the registrar's order API.
//
// ## Implementations
//
// - ASCIO SOAP v3: `regsync-registrar-ascio` crate
//
// ## Usage
//
// ```rust,ignore
// use regsync_core::{Credentials, RegistrarClient};
// use regsync_core::traits::DomainQuery;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* RegistrarClient implementation */;
//     let creds = Credentials::new("account", "password");
//
//     let response = client
//         .get_domains(&creds, &DomainQuery::for_name("example.com"))
//         .await?;
//     println!("{} record(s)", response.total_count);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::error::RESULT_CODE_SUCCESS;
use crate::model::{Contact, CurrentState, NameServers};

/// Result envelope every registrar response carries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseStatus {
    /// Numeric result code (200/201 on success)
    pub result_code: i32,
    /// Human-readable result message
    pub result_message: String,
    /// Raw error strings
    pub errors: Vec<String>,
}

impl ResponseStatus {
    /// Success means an accepted result code AND an empty error list
    pub fn is_success(&self) -> bool {
        RESULT_CODE_SUCCESS.contains(&self.result_code) && self.errors.is_empty()
    }

    /// Convert a non-success status into an upstream rejection
    pub fn to_error(&self) -> crate::Error {
        crate::Error::upstream(
            self.result_code,
            self.result_message.clone(),
            self.errors.clone(),
        )
    }
}

/// Domain status filter for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainStatusFilter {
    #[default]
    All,
    AllExceptDeleted,
    Active,
    Expiring,
    PendingVerification,
    Parked,
    PendingAuction,
    Queued,
    Lock,
    TransferLock,
    UpdateLock,
    DeleteLock,
    Deleted,
}

impl DomainStatusFilter {
    /// Value the registrar expects
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::AllExceptDeleted => "All Except Deleted",
            Self::Active => "Active",
            Self::Expiring => "Expiring",
            Self::PendingVerification => "Pending Verification",
            Self::Parked => "Parked",
            Self::PendingAuction => "Pending Auction",
            Self::Queued => "Queued",
            Self::Lock => "Lock",
            Self::TransferLock => "Transfer Lock",
            Self::UpdateLock => "Update Lock",
            Self::DeleteLock => "Delete Lock",
            Self::Deleted => "Deleted",
        }
    }
}

impl std::str::FromStr for DomainStatusFilter {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [DomainStatusFilter; 13] = [
            DomainStatusFilter::All,
            DomainStatusFilter::AllExceptDeleted,
            DomainStatusFilter::Active,
            DomainStatusFilter::Expiring,
            DomainStatusFilter::PendingVerification,
            DomainStatusFilter::Parked,
            DomainStatusFilter::PendingAuction,
            DomainStatusFilter::Queued,
            DomainStatusFilter::Lock,
            DomainStatusFilter::TransferLock,
            DomainStatusFilter::UpdateLock,
            DomainStatusFilter::DeleteLock,
            DomainStatusFilter::Deleted,
        ];
        ALL.into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::config(format!("Unknown domain status filter: {}", s)))
    }
}

/// Domain type filter for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainTypeFilter {
    Premium,
    Standard,
}

impl DomainTypeFilter {
    /// Value the registrar expects
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Standard => "Standard",
        }
    }
}

/// Filtered, paged domain listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainQuery {
    /// Sort order, e.g. `CreatedAsc`
    pub order_sort: String,
    pub status: DomainStatusFilter,
    /// Only these TLDs (empty = all)
    pub tlds: Vec<String>,
    /// Only these domain names (empty = all)
    pub names: Vec<String>,
    pub domain_type: Option<DomainTypeFilter>,
    pub comment: Option<String>,
    /// Expiry window start, RFC 3339
    pub expire_from: Option<String>,
    /// Expiry window end, RFC 3339
    pub expire_to: Option<String>,
    /// 1-based page index
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for DomainQuery {
    fn default() -> Self {
        Self {
            order_sort: "CreatedAsc".to_string(),
            status: DomainStatusFilter::All,
            tlds: Vec::new(),
            names: Vec::new(),
            domain_type: None,
            comment: None,
            expire_from: None,
            expire_to: None,
            page_index: 1,
            page_size: 1000,
        }
    }
}

impl DomainQuery {
    /// Query scoped to exactly one domain name
    pub fn for_name(domain: impl Into<String>) -> Self {
        Self {
            names: vec![domain.into()],
            ..Self::default()
        }
    }
}

/// Response to a domain listing
#[derive(Debug, Clone, Default)]
pub struct GetDomainsResponse {
    pub status: ResponseStatus,
    /// Total matches across all pages
    pub total_count: u32,
    /// Records on this page
    pub domains: Vec<CurrentState>,
}

/// Kinds of domain orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Register,
    NameserverUpdate,
    ContactUpdate,
    OwnerChange,
    RegistrantDetailsUpdate,
}

impl OrderType {
    /// Order type name on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Register => "Register",
            Self::NameserverUpdate => "NameserverUpdate",
            Self::ContactUpdate => "ContactUpdate",
            Self::OwnerChange => "OwnerChange",
            Self::RegistrantDetailsUpdate => "RegistrantDetailsUpdate",
        }
    }

    /// Process name the TLD catalog lists this order under
    pub fn catalog_command(self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::NameserverUpdate => "NAMESERVER UPDATE",
            Self::ContactUpdate => "CONTACT UPDATE",
            Self::OwnerChange => "OWNER CHANGE",
            Self::RegistrantDetailsUpdate => "REGISTRANT DETAILS UPDATE",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain part of an order; absent fields are not sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDomain {
    pub name: String,
    pub owner: Option<Contact>,
    pub admin: Option<Contact>,
    pub tech: Option<Contact>,
    pub billing: Option<Contact>,
    pub name_servers: Option<NameServers>,
    /// `false` hides contact data in WHOIS
    pub disclose_social_data: Option<bool>,
    /// Registrar acts as local presence
    pub local_presence: Option<bool>,
    /// Trademark country for TLDs that demand one
    pub trademark_country: Option<String>,
}

/// A domain order (`v3:DomainOrderRequest`)
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub order_type: OrderType,
    pub domain: OrderDomain,
}

impl OrderRequest {
    /// Create an order for a domain with no payload yet
    pub fn new(order_type: OrderType, domain_name: impl Into<String>) -> Self {
        Self {
            order_type,
            domain: OrderDomain {
                name: domain_name.into(),
                ..OrderDomain::default()
            },
        }
    }
}

/// Order reference returned for an accepted order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderInfo {
    pub order_id: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "Type")]
    pub order_type: Option<String>,
}

/// Response to an order
#[derive(Debug, Clone, Default)]
pub struct CreateOrderResponse {
    pub status: ResponseStatus,
    pub order: Option<OrderInfo>,
}

/// One price line of an availability answer
#[derive(Debug, Clone, PartialEq)]
pub struct PriceInfo {
    /// Order type the price applies to (`Register`, `Renew`, ...)
    pub order_type: String,
    pub price: f64,
}

/// Response to an availability and pricing query
#[derive(Debug, Clone, Default)]
pub struct AvailabilityInfoResponse {
    pub status: ResponseStatus,
    /// `Standard` or a premium tier name
    pub domain_type: Option<String>,
    pub currency: Option<String>,
    pub prices: Vec<PriceInfo>,
}

/// Trait for registrar client implementations
///
/// Clients translate typed requests to the registrar's wire format and
/// back. They never decide whether a call is needed and never retry.
///
/// # Errors
///
/// A registrar that answered, even with a failure code, yields `Ok` with
/// the failure in [`ResponseStatus`]. `Err` is reserved for transport
/// problems: unreachable endpoint, protocol fault, unparsable answer.
#[async_trait]
pub trait RegistrarClient: Send + Sync {
    /// List domains matching a query
    async fn get_domains(
        &self,
        credentials: &Credentials,
        query: &DomainQuery,
    ) -> Result<GetDomainsResponse, crate::Error>;

    /// Place a domain order
    async fn create_order(
        &self,
        credentials: &Credentials,
        request: &OrderRequest,
    ) -> Result<CreateOrderResponse, crate::Error>;

    /// Query availability and price of a domain
    async fn availability_info(
        &self,
        credentials: &Credentials,
        domain: &str,
    ) -> Result<AvailabilityInfoResponse, crate::Error>;

    /// Get the registrar name (for logging/debugging)
    fn registrar_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_needs_code_and_empty_errors() {
        let ok = ResponseStatus {
            result_code: 201,
            result_message: "Created".into(),
            errors: Vec::new(),
        };
        assert!(ok.is_success());

        let with_errors = ResponseStatus {
            errors: vec!["boom".into()],
            ..ok.clone()
        };
        assert!(!with_errors.is_success());

        let bad_code = ResponseStatus {
            result_code: 500,
            ..ok
        };
        assert!(!bad_code.is_success());
    }

    #[test]
    fn status_filter_parses_display_names() {
        let parsed: DomainStatusFilter = "transfer lock".parse().unwrap();
        assert_eq!(parsed, DomainStatusFilter::TransferLock);
        assert!("sleeping".parse::<DomainStatusFilter>().is_err());
    }

    #[test]
    fn query_defaults() {
        let query = DomainQuery::for_name("example.com");
        assert_eq!(query.order_sort, "CreatedAsc");
        assert_eq!(query.page_index, 1);
        assert_eq!(query.page_size, 1000);
        assert_eq!(query.names, vec!["example.com".to_string()]);
    }
}
