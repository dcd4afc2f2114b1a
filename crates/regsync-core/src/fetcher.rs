//! Domain state fetcher
//!
//! Wraps [`RegistrarClient::get_domains`] and folds the registrar's result
//! envelope into a plain `Result`: a non-success code or a non-empty error
//! list becomes [`Error::Upstream`](crate::Error::Upstream) carrying the raw
//! error strings.

use tracing::debug;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::model::CurrentState;
use crate::traits::{DomainQuery, RegistrarClient};

/// Outcome of looking up a single domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The account holds the domain
    Found(Box<CurrentState>),
    /// Not registered, or registered to someone else
    NotFound,
}

/// One page of a domain listing
#[derive(Debug, Clone, Default)]
pub struct DomainList {
    /// Matches across all pages
    pub total_count: u32,
    pub records: Vec<CurrentState>,
}

/// Reads registration state through a registrar client
pub struct DomainStateFetcher<'a> {
    registrar: &'a dyn RegistrarClient,
}

impl<'a> DomainStateFetcher<'a> {
    pub fn new(registrar: &'a dyn RegistrarClient) -> Self {
        Self { registrar }
    }

    /// Current record of exactly one domain
    pub async fn fetch(&self, credentials: &Credentials, domain: &str) -> Result<FetchOutcome> {
        let list = self.list(credentials, &DomainQuery::for_name(domain)).await?;

        if list.total_count == 0 {
            debug!("No record for {} in this account", domain);
            return Ok(FetchOutcome::NotFound);
        }

        // The name filter can match more than one record; prefer the exact name.
        let mut records = list.records;
        let index = records
            .iter()
            .position(|r| r.domain_name.eq_ignore_ascii_case(domain))
            .unwrap_or(0);

        if index >= records.len() {
            return Err(Error::transport(format!(
                "Registrar reported {} match(es) for {} but returned no records",
                list.total_count, domain
            )));
        }

        Ok(FetchOutcome::Found(Box::new(records.swap_remove(index))))
    }

    /// Domains matching a query; filter names and TLDs are IDNA-encoded first
    pub async fn list(&self, credentials: &Credentials, query: &DomainQuery) -> Result<DomainList> {
        let query = encode_query(query)?;

        let response = self.registrar.get_domains(credentials, &query).await?;
        if !response.status.is_success() {
            return Err(response.status.to_error());
        }

        debug!(
            "{} returned {} of {} record(s)",
            self.registrar.registrar_name(),
            response.domains.len(),
            response.total_count
        );

        Ok(DomainList {
            total_count: response.total_count,
            records: response.domains,
        })
    }

    /// Every domain matching a query, following pages until the total is reached
    pub async fn list_all(&self, credentials: &Credentials, query: &DomainQuery) -> Result<Vec<CurrentState>> {
        let mut query = query.clone();
        let mut records = Vec::new();

        loop {
            let page = self.list(credentials, &query).await?;
            let received = page.records.len();
            records.extend(page.records);

            if received == 0 || records.len() >= page.total_count as usize {
                return Ok(records);
            }
            query.page_index += 1;
        }
    }
}

fn encode_query(query: &DomainQuery) -> Result<DomainQuery> {
    let encode = |values: &[String]| -> Result<Vec<String>> {
        values
            .iter()
            .map(|value| {
                idna::domain_to_ascii(value.trim()).map_err(|e| {
                    Error::validation(format!("'{}' is not a valid domain name: {:?}", value, e))
                })
            })
            .collect()
    };

    Ok(DomainQuery {
        names: encode(&query.names)?,
        tlds: encode(&query.tlds)?,
        ..query.clone()
    })
}
