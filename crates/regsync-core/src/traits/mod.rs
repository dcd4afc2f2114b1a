//! Core traits for regsync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`RegistrarClient`]: Query and order against the registrar
//! - [`TldCatalog`]: Look up per-TLD registry policy
//! - [`PolicyCache`]: Store catalog entries between runs
//! - [`RequestLog`]: Injected logging of outgoing registrar requests

pub mod registrar;
pub mod catalog;
pub mod policy_cache;
pub mod request_log;

pub use registrar::{
    AvailabilityInfoResponse, CreateOrderResponse, DomainQuery, DomainStatusFilter,
    DomainTypeFilter, GetDomainsResponse, OrderDomain, OrderInfo, OrderRequest, OrderType,
    PriceInfo, RegistrarClient, ResponseStatus,
};
pub use catalog::{TldCatalog, TldInfo, TldProcess};
pub use policy_cache::{CachedTld, PolicyCache};
pub use request_log::{RequestLog, TracingRequestLog};
