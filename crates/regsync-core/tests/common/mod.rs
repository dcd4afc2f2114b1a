//! Test doubles and common utilities for reconciliation contract tests
//!
//! The registrar double answers from a script and records every order it
//! receives; clones share the script and the record.

#![allow(dead_code)]

use regsync_core::error::Result;
use regsync_core::traits::{
    AvailabilityInfoResponse, CreateOrderResponse, DomainQuery, GetDomainsResponse, OrderInfo,
    OrderRequest, OrderType, PriceInfo, RegistrarClient, ResponseStatus, TldCatalog, TldInfo,
    TldProcess,
};
use regsync_core::{
    Contact, Credentials, CurrentState, DesiredConfig, Error, MemoryPolicyCache, NameServers,
    PolicyFlags, Reconciler, TldPolicySource,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn ok_status(message: &str) -> ResponseStatus {
    ResponseStatus {
        result_code: 200,
        result_message: message.to_string(),
        errors: Vec::new(),
    }
}

pub fn failed_status(code: i32, errors: &[&str]) -> ResponseStatus {
    ResponseStatus {
        result_code: code,
        result_message: "Failed".to_string(),
        errors: errors.iter().map(|e| e.to_string()).collect(),
    }
}

/// Availability answer for a standard or premium domain
pub fn availability(available: bool, premium: bool, price: f64) -> AvailabilityInfoResponse {
    AvailabilityInfoResponse {
        status: ok_status(if available { "Available" } else { "Not Available" }),
        domain_type: Some(if premium { "Premium" } else { "Standard" }.to_string()),
        currency: Some("EUR".to_string()),
        prices: vec![PriceInfo {
            order_type: "Register".to_string(),
            price,
        }],
    }
}

/// Accepted order with a reference
pub fn accepted(order_id: &str) -> CreateOrderResponse {
    CreateOrderResponse {
        status: ok_status("OK"),
        order: Some(OrderInfo {
            order_id: Some(order_id.to_string()),
            status: Some("Received".to_string()),
            order_type: None,
        }),
    }
}

/// A scripted RegistrarClient that records orders
#[derive(Clone)]
pub struct ScriptedRegistrar {
    /// Record returned by get_domains; `None` = not held
    domain: Arc<Mutex<Option<CurrentState>>>,
    /// Status of get_domains
    domains_status: Arc<Mutex<ResponseStatus>>,
    /// get_domains fails at the transport level
    domains_transport_error: Arc<Mutex<bool>>,
    availability: Arc<Mutex<Option<AvailabilityInfoResponse>>>,
    /// Answers for create_order, in call order; accepted once drained
    order_script: Arc<Mutex<VecDeque<Result<CreateOrderResponse>>>>,
    orders: Arc<Mutex<Vec<OrderRequest>>>,
    get_domains_calls: Arc<AtomicUsize>,
    availability_calls: Arc<AtomicUsize>,
}

impl ScriptedRegistrar {
    /// Registrar holding `domain`, or nothing when `None`
    pub fn new(domain: Option<CurrentState>) -> Self {
        Self {
            domain: Arc::new(Mutex::new(domain)),
            domains_status: Arc::new(Mutex::new(ok_status("OK"))),
            domains_transport_error: Arc::new(Mutex::new(false)),
            availability: Arc::new(Mutex::new(Some(availability(true, false, 9.99)))),
            order_script: Arc::new(Mutex::new(VecDeque::new())),
            orders: Arc::new(Mutex::new(Vec::new())),
            get_domains_calls: Arc::new(AtomicUsize::new(0)),
            availability_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_domains_status(self, status: ResponseStatus) -> Self {
        *self.domains_status.lock().unwrap() = status;
        self
    }

    pub fn with_domains_transport_error(self) -> Self {
        *self.domains_transport_error.lock().unwrap() = true;
        self
    }

    pub fn with_availability(self, response: AvailabilityInfoResponse) -> Self {
        *self.availability.lock().unwrap() = Some(response);
        self
    }

    /// availability_info fails at the transport level
    pub fn with_availability_transport_error(self) -> Self {
        *self.availability.lock().unwrap() = None;
        self
    }

    /// Queue the answer for the next create_order call
    pub fn then_order(self, response: Result<CreateOrderResponse>) -> Self {
        self.order_script.lock().unwrap().push_back(response);
        self
    }

    /// Orders received so far
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().unwrap().clone()
    }

    /// Types of the orders received so far
    pub fn order_types(&self) -> Vec<OrderType> {
        self.orders().iter().map(|o| o.order_type).collect()
    }

    pub fn get_domains_calls(&self) -> usize {
        self.get_domains_calls.load(Ordering::SeqCst)
    }

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    pub fn remote_calls(&self) -> usize {
        self.get_domains_calls() + self.availability_calls() + self.orders().len()
    }
}

#[async_trait::async_trait]
impl RegistrarClient for ScriptedRegistrar {
    async fn get_domains(
        &self,
        _credentials: &Credentials,
        query: &DomainQuery,
    ) -> Result<GetDomainsResponse> {
        self.get_domains_calls.fetch_add(1, Ordering::SeqCst);

        if *self.domains_transport_error.lock().unwrap() {
            return Err(Error::transport("connection reset by peer"));
        }

        let status = self.domains_status.lock().unwrap().clone();
        let domains: Vec<CurrentState> = self
            .domain
            .lock()
            .unwrap()
            .iter()
            .filter(|d| query.names.is_empty() || query.names.contains(&d.domain_name))
            .cloned()
            .collect();

        Ok(GetDomainsResponse {
            status,
            total_count: domains.len() as u32,
            domains,
        })
    }

    async fn create_order(
        &self,
        _credentials: &Credentials,
        request: &OrderRequest,
    ) -> Result<CreateOrderResponse> {
        self.orders.lock().unwrap().push(request.clone());
        self.order_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(accepted("TEST-ORDER")))
    }

    async fn availability_info(
        &self,
        _credentials: &Credentials,
        _domain: &str,
    ) -> Result<AvailabilityInfoResponse> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        self.availability
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::transport("availability endpoint unreachable"))
    }

    fn registrar_name(&self) -> &'static str {
        "scripted"
    }
}

/// A TldCatalog answering every TLD with the same entry
#[derive(Clone)]
pub struct StaticCatalog {
    info: Option<TldInfo>,
    fetch_count: Arc<AtomicUsize>,
}

impl StaticCatalog {
    /// Catalog without requirements
    pub fn permissive() -> Self {
        Self::new(TldInfo::default())
    }

    pub fn new(info: TldInfo) -> Self {
        Self {
            info: Some(info),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every lookup fails
    pub fn unreachable() -> Self {
        Self {
            info: None,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TldCatalog for StaticCatalog {
    async fn fetch_tld(&self, _credentials: &Credentials, tld: &str) -> Result<TldInfo> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.info
            .clone()
            .ok_or_else(|| Error::catalog(format!("catalog lookup for .{} timed out", tld)))
    }

    fn catalog_name(&self) -> &'static str {
        "static"
    }
}

/// Catalog entry with documentation required for the listed commands
pub fn docs_required_for(commands: &[&str]) -> TldInfo {
    TldInfo {
        processes: commands
            .iter()
            .map(|command| TldProcess {
                command: command.to_string(),
                documentation_required: Some(true),
                procedure: None,
            })
            .collect(),
        ..Default::default()
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("test-account", "test-password")
}

pub fn contact(first: &str, last: &str, email: &str) -> Contact {
    Contact {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        org_name: Some("Example Ltd".to_string()),
        address1: Some("1 Main Street".to_string()),
        city: Some("Vienna".to_string()),
        postal_code: Some("1010".to_string()),
        country_code: Some("AT".to_string()),
        phone: Some("+43.1234567".to_string()),
        email: Some(email.to_string()),
        contact_type: Some("Individual".to_string()),
        ..Default::default()
    }
}

/// Desired config with two nameservers and identical contacts
pub fn desired(domain: &str) -> DesiredConfig {
    let person = contact("Ada", "Lovelace", "ada@example.com");
    DesiredConfig {
        domain: domain.to_string(),
        nameservers: vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()],
        contact_owner: person.clone(),
        contact_admin: person.clone(),
        contact_tech: person.clone(),
        contact_billing: person,
        flags: PolicyFlags::default(),
    }
}

/// Registrar record matching a desired config exactly
pub fn current_for(desired: &DesiredConfig) -> CurrentState {
    CurrentState {
        domain_name: desired.domain.clone(),
        status: Some("ACTIVE".to_string()),
        expires: Some("2030-01-01T00:00:00".to_string()),
        name_servers: NameServers::from_hosts(&desired.nameservers),
        owner: desired.contact_owner.clone(),
        admin: desired.contact_admin.clone(),
        tech: desired.contact_tech.clone(),
        billing: desired.contact_billing.clone(),
    }
}

/// Reconciler over the given doubles with an in-memory policy cache
pub fn reconciler(registrar: &ScriptedRegistrar, catalog: &StaticCatalog) -> Reconciler {
    let policy = TldPolicySource::new(
        Box::new(catalog.clone()),
        Box::new(MemoryPolicyCache::new()),
    );
    Reconciler::new(Box::new(registrar.clone()), policy, credentials())
}
