//! Domain report
//!
//! Condenses listed records into one row per domain and writes them as CSV.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::model::CurrentState;

/// Column header of the CSV report
pub const REPORT_COLUMNS: [&str; 5] = ["Domain", "NameServers", "Owner", "Admin", "Tech"];

/// Condensed view of one domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    /// Nameserver host names in position order
    pub ns: Vec<String>,
    pub owner: String,
    pub admin: String,
    pub tech: String,
}

impl DomainSummary {
    pub fn from_record(record: &CurrentState) -> Self {
        Self {
            ns: record.name_servers.hosts(),
            owner: record.owner.summary(),
            admin: record.admin.summary(),
            tech: record.tech.summary(),
        }
    }
}

/// Summaries keyed by domain name
pub fn summarize(records: &[CurrentState]) -> BTreeMap<String, DomainSummary> {
    records
        .iter()
        .map(|record| (record.domain_name.clone(), DomainSummary::from_record(record)))
        .collect()
}

/// Write summaries as CSV; `false` if the file could not be written
pub fn write_domain_csv(domains: &BTreeMap<String, DomainSummary>, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match try_write(domains, path) {
        Ok(()) => {
            tracing::debug!("Wrote {} domain(s) to {}", domains.len(), path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Failed to write domain report {}: {}", path.display(), e);
            false
        }
    }
}

fn try_write(domains: &BTreeMap<String, DomainSummary>, path: &Path) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(REPORT_COLUMNS)?;
    for (domain, summary) in domains {
        let ns = summary.ns.join(" ");
        writer.write_record([
            domain.as_str(),
            ns.as_str(),
            summary.owner.as_str(),
            summary.admin.as_str(),
            summary.tech.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, NameServers};
    use tempfile::tempdir;

    fn record(name: &str) -> CurrentState {
        CurrentState {
            domain_name: name.to_string(),
            name_servers: NameServers::from_positions(vec![
                (1, Some("ns1.example.com".to_string())),
                (2, None),
                (3, Some("ns3.example.com".to_string())),
            ]),
            owner: Contact {
                first_name: Some("Ada".to_string()),
                last_name: Some("Lovelace".to_string()),
                org_name: Some("Engines Ltd".to_string()),
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            },
            admin: Contact {
                first_name: Some("Grace".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn summary_drops_empty_nameservers() {
        let map = summarize(&[record("example.com")]);
        let summary = &map["example.com"];
        assert_eq!(summary.ns, vec!["ns1.example.com", "ns3.example.com"]);
        assert_eq!(summary.owner, "Ada Lovelace Engines Ltd ada@example.com");
        assert_eq!(summary.admin, "Grace None None None");
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("domains.csv");
        let map = summarize(&[record("b.example"), record("a.example")]);

        assert!(write_domain_csv(&map, &path));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Domain,NameServers,Owner,Admin,Tech");
        assert!(lines[1].starts_with("a.example,ns1.example.com ns3.example.com,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn unwritable_path_returns_false() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("domains.csv");
        assert!(!write_domain_csv(&BTreeMap::new(), &path));
    }
}
