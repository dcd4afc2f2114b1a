//! Registration data model
//!
//! Typed views of what the registrar holds for a domain. Only the
//! attributes listed here take part in comparisons, so registrar-internal
//! fields (handles, timestamps, status flags) never show up as differences.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Contact attributes that may differ without an ownership change
pub const OWNER_CHANGE_ATTRIBUTES: [&str; 4] = ["FirstName", "LastName", "OrganisationNumber", "Email"];

/// The four contact roles a domain carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactRole {
    /// Registrant
    Owner,
    /// Administrative contact
    Admin,
    /// Technical contact
    Tech,
    /// Billing contact
    Billing,
}

impl ContactRole {
    /// All roles in wire order
    pub const ALL: [ContactRole; 4] = [Self::Owner, Self::Admin, Self::Tech, Self::Billing];

    /// Element name used by the registrar
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Admin => "Admin",
            Self::Tech => "Tech",
            Self::Billing => "Billing",
        }
    }
}

/// A contact record restricted to the compared attribute set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
}

impl Contact {
    /// Compared attributes as (registrar name, value) pairs
    pub fn attributes(&self) -> [(&'static str, Option<&str>); 16] {
        [
            ("FirstName", self.first_name.as_deref()),
            ("LastName", self.last_name.as_deref()),
            ("OrgName", self.org_name.as_deref()),
            ("Address1", self.address1.as_deref()),
            ("Address2", self.address2.as_deref()),
            ("City", self.city.as_deref()),
            ("State", self.state.as_deref()),
            ("PostalCode", self.postal_code.as_deref()),
            ("CountryCode", self.country_code.as_deref()),
            ("Phone", self.phone.as_deref()),
            ("Email", self.email.as_deref()),
            ("Type", self.contact_type.as_deref()),
            ("Details", self.details.as_deref()),
            ("OrganisationNumber", self.organisation_number.as_deref()),
            ("Number", self.number.as_deref()),
            ("VatNumber", self.vat_number.as_deref()),
        ]
    }

    /// Mutable slot for a registrar attribute name, `None` if not compared
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        let slot = match name {
            "FirstName" => &mut self.first_name,
            "LastName" => &mut self.last_name,
            "OrgName" => &mut self.org_name,
            "Address1" => &mut self.address1,
            "Address2" => &mut self.address2,
            "City" => &mut self.city,
            "State" => &mut self.state,
            "PostalCode" => &mut self.postal_code,
            "CountryCode" => &mut self.country_code,
            "Phone" => &mut self.phone,
            "Email" => &mut self.email,
            "Type" => &mut self.contact_type,
            "Details" => &mut self.details,
            "OrganisationNumber" => &mut self.organisation_number,
            "Number" => &mut self.number,
            "VatNumber" => &mut self.vat_number,
            _ => return None,
        };
        Some(slot)
    }

    /// Names of the attributes whose values differ from `other`
    pub fn changed_attributes(&self, other: &Contact) -> Vec<&'static str> {
        self.attributes()
            .into_iter()
            .zip(other.attributes())
            .filter(|((_, before), (_, after))| before != after)
            .map(|((name, _), _)| name)
            .collect()
    }

    /// One-line summary used in reports
    pub fn summary(&self) -> String {
        [
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.org_name.as_deref(),
            self.email.as_deref(),
        ]
        .iter()
        .map(|part| part.unwrap_or("None"))
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Nameservers keyed by their 1-based position (`NameServer1`..`NameServer13`)
///
/// Serializes to the registrar's map shape:
/// `{"NameServer1": {"HostName": "ns1.example.com"}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameServers(BTreeMap<u8, String>);

impl NameServers {
    /// Build from an ordered host list; position 1 is the first entry
    pub fn from_hosts<S: AsRef<str>>(hosts: &[S]) -> Self {
        Self::from_positions(
            hosts
                .iter()
                .enumerate()
                .map(|(i, host)| ((i + 1) as u8, Some(host.as_ref().to_string()))),
        )
    }

    /// Build from positional slots as returned by the registrar
    ///
    /// Empty slots are skipped without renumbering the following ones.
    pub fn from_positions<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = (u8, Option<String>)>,
    {
        let entries = slots
            .into_iter()
            .filter_map(|(position, host)| {
                let host = host?;
                let host = host.strip_suffix('.').unwrap_or(&host).to_string();
                if host.is_empty() {
                    None
                } else {
                    Some((position, host))
                }
            })
            .collect();
        Self(entries)
    }

    /// Number of populated positions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no position is populated
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Populated positions in order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.0.iter().map(|(position, host)| (*position, host.as_str()))
    }

    /// Host names in position order
    pub fn hosts(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }
}

impl Serialize for NameServers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Host<'a> {
            #[serde(rename = "HostName")]
            host_name: &'a str,
        }

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (position, host) in &self.0 {
            map.serialize_entry(&format!("NameServer{}", position), &Host { host_name: host })?;
        }
        map.end()
    }
}

/// A registration record as currently held by the registrar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrentState {
    /// Domain name in ASCII form
    pub domain_name: String,
    /// Registrar status text, when returned
    pub status: Option<String>,
    /// Expiry date, when returned
    pub expires: Option<String>,
    /// Delegated nameservers
    pub name_servers: NameServers,
    pub owner: Contact,
    pub admin: Contact,
    pub tech: Contact,
    pub billing: Contact,
}

impl CurrentState {
    /// Contact record for a role
    pub fn contact(&self, role: ContactRole) -> &Contact {
        match role {
            ContactRole::Owner => &self.owner,
            ContactRole::Admin => &self.admin,
            ContactRole::Tech => &self.tech,
            ContactRole::Billing => &self.billing,
        }
    }

    /// Mutable contact record for a role
    pub fn contact_mut(&mut self, role: ContactRole) -> &mut Contact {
        match role {
            ContactRole::Owner => &mut self.owner,
            ContactRole::Admin => &mut self.admin,
            ContactRole::Tech => &mut self.tech,
            ContactRole::Billing => &mut self.billing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nameservers_strip_trailing_dot() {
        let ns = NameServers::from_hosts(&["ns1.example.com.", "ns2.example.com"]);
        assert_eq!(ns.hosts(), vec!["ns1.example.com", "ns2.example.com"]);
    }

    #[test]
    fn nameservers_keep_positions_across_gaps() {
        let ns = NameServers::from_positions(vec![
            (1, Some("a.example".to_string())),
            (2, None),
            (3, Some("c.example".to_string())),
        ]);
        let positions: Vec<u8> = ns.iter().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![1, 3]);
    }

    #[test]
    fn nameservers_serialize_as_registrar_map() {
        let ns = NameServers::from_hosts(&["ns1.example.com", "ns2.example.com"]);
        let json = serde_json::to_value(&ns).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "NameServer1": {"HostName": "ns1.example.com"},
                "NameServer2": {"HostName": "ns2.example.com"},
            })
        );
    }

    #[test]
    fn nameserver_ten_sorts_after_two() {
        let hosts: Vec<String> = (1..=10).map(|i| format!("ns{}.example.com", i)).collect();
        let ns = NameServers::from_hosts(&hosts);
        assert_eq!(ns.hosts().last().map(String::as_str), Some("ns10.example.com"));
    }

    #[test]
    fn contact_reports_changed_attributes() {
        let before = Contact {
            first_name: Some("Ada".into()),
            city: Some("London".into()),
            ..Default::default()
        };
        let after = Contact {
            first_name: Some("Ada".into()),
            city: Some("Paris".into()),
            email: Some("ada@example.com".into()),
            ..Default::default()
        };
        assert_eq!(before.changed_attributes(&after), vec!["City", "Email"]);
    }

    #[test]
    fn contact_rejects_unknown_attribute() {
        let parsed: Result<Contact, _> = serde_json::from_str(r#"{"FirstName":"A","Handle":"X1"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn contact_attribute_slots_cover_compared_set() {
        let mut contact = Contact::default();
        for (name, _) in Contact::default().attributes() {
            *contact.attribute_mut(name).unwrap() = Some(name.to_string());
        }
        assert!(contact.attributes().iter().all(|(name, value)| *value == Some(*name)));
        assert!(contact.attribute_mut("Handle").is_none());
    }
}
