//! Architectural Contract Test: Domain Listing
//!
//! This test verifies listing and reporting over a paged registrar.
//!
//! Constraints verified:
//! - list_all follows pages until the reported total is reached
//! - Filter names are sent in ASCII form
//! - A rejected listing surfaces the registrar's errors
//! - Listed records summarize into one CSV row per domain
//!
//! If this test fails, list mode may miss or duplicate domains.

mod common;

use common::*;
use regsync_core::error::Result;
use regsync_core::fetcher::DomainStateFetcher;
use regsync_core::report::{summarize, write_domain_csv};
use regsync_core::traits::{
    AvailabilityInfoResponse, CreateOrderResponse, DomainQuery, GetDomainsResponse, OrderRequest,
    RegistrarClient,
};
use regsync_core::{Credentials, CurrentState, Error, NameServers};
use std::sync::Mutex;

/// Registrar holding `count` domains, served page by page
struct PagedRegistrar {
    records: Vec<CurrentState>,
    queries: Mutex<Vec<DomainQuery>>,
}

impl PagedRegistrar {
    fn new(count: usize) -> Self {
        let records = (0..count)
            .map(|i| {
                let mut record = current_for(&desired(&format!("domain{:03}.com", i)));
                record.name_servers = NameServers::from_hosts(&["ns1.example.com", "ns2.example.com"]);
                record
            })
            .collect();
        Self {
            records,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn pages_requested(&self) -> Vec<u32> {
        self.queries.lock().unwrap().iter().map(|q| q.page_index).collect()
    }
}

#[async_trait::async_trait]
impl RegistrarClient for PagedRegistrar {
    async fn get_domains(
        &self,
        _credentials: &Credentials,
        query: &DomainQuery,
    ) -> Result<GetDomainsResponse> {
        self.queries.lock().unwrap().push(query.clone());

        let start = ((query.page_index - 1) * query.page_size) as usize;
        let domains: Vec<CurrentState> = self
            .records
            .iter()
            .skip(start)
            .take(query.page_size as usize)
            .cloned()
            .collect();

        Ok(GetDomainsResponse {
            status: ok_status("OK"),
            total_count: self.records.len() as u32,
            domains,
        })
    }

    async fn create_order(
        &self,
        _credentials: &Credentials,
        _request: &OrderRequest,
    ) -> Result<CreateOrderResponse> {
        Err(Error::transport("listing never orders"))
    }

    async fn availability_info(
        &self,
        _credentials: &Credentials,
        _domain: &str,
    ) -> Result<AvailabilityInfoResponse> {
        Err(Error::transport("listing never prices"))
    }

    fn registrar_name(&self) -> &'static str {
        "paged"
    }
}

#[tokio::test]
async fn list_all_follows_pages() {
    let registrar = PagedRegistrar::new(25);
    let fetcher = DomainStateFetcher::new(&registrar);

    let query = DomainQuery {
        page_size: 10,
        ..DomainQuery::default()
    };
    let records = fetcher.list_all(&credentials(), &query).await.unwrap();

    assert_eq!(records.len(), 25);
    assert_eq!(registrar.pages_requested(), vec![1, 2, 3]);
    assert_eq!(records[24].domain_name, "domain024.com");
}

#[tokio::test]
async fn empty_account_needs_one_page() {
    let registrar = PagedRegistrar::new(0);
    let fetcher = DomainStateFetcher::new(&registrar);

    let records = fetcher
        .list_all(&credentials(), &DomainQuery::default())
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(registrar.pages_requested(), vec![1]);
}

#[tokio::test]
async fn filter_names_are_sent_ascii() {
    let registrar = PagedRegistrar::new(1);
    let fetcher = DomainStateFetcher::new(&registrar);

    let query = DomainQuery {
        names: vec!["müller.de".to_string()],
        ..DomainQuery::default()
    };
    fetcher.list(&credentials(), &query).await.unwrap();

    let sent = registrar.queries.lock().unwrap()[0].names.clone();
    assert_eq!(sent, vec!["xn--mller-kva.de".to_string()]);
}

#[tokio::test]
async fn rejected_listing_is_upstream_error() {
    let registrar = ScriptedRegistrar::new(None)
        .with_domains_status(failed_status(401, &["Access denied"]));
    let fetcher = DomainStateFetcher::new(&registrar);

    let err = fetcher
        .list_all(&credentials(), &DomainQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream { code: 401, .. }));
    assert_eq!(err.messages(), vec!["Access denied".to_string()]);
}

#[tokio::test]
async fn listed_domains_report_as_csv() {
    let registrar = PagedRegistrar::new(3);
    let fetcher = DomainStateFetcher::new(&registrar);
    let records = fetcher
        .list_all(&credentials(), &DomainQuery::default())
        .await
        .unwrap();

    let summaries = summarize(&records);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("domains.csv");
    assert!(write_domain_csv(&summaries, &path));

    let written = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "Domain,NameServers,Owner,Admin,Tech");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("domain000.com,ns1.example.com ns2.example.com,"));
}
