//! Order payloads
//!
//! Builds the request for each order type from the desired config and
//! applies the per-TLD registration special cases.

use crate::config::DesiredConfig;
use crate::traits::{OrderRequest, OrderType};

/// TLDs where contact data can be hidden in WHOIS
pub const HIDE_WHOIS_TLDS: [&str; 3] = ["com", "cc", "tv"];

/// TLDs that need a trademark country (taken from the owner)
pub const TRADEMARK_COUNTRY_TLDS: [&str; 1] = ["it"];

/// Request for an order type carrying the facets that order converges
pub fn build(order_type: OrderType, desired: &DesiredConfig) -> OrderRequest {
    let mut request = OrderRequest::new(order_type, desired.domain.clone());
    let domain = &mut request.domain;

    match order_type {
        OrderType::Register => {
            domain.owner = Some(desired.contact_owner.clone());
            domain.admin = Some(desired.contact_admin.clone());
            domain.tech = Some(desired.contact_tech.clone());
            domain.billing = Some(desired.contact_billing.clone());
            domain.name_servers = Some(desired.name_servers());
        }
        OrderType::NameserverUpdate => {
            domain.name_servers = Some(desired.name_servers());
        }
        OrderType::ContactUpdate => {
            domain.admin = Some(desired.contact_admin.clone());
            domain.tech = Some(desired.contact_tech.clone());
            domain.billing = Some(desired.contact_billing.clone());
        }
        OrderType::OwnerChange | OrderType::RegistrantDetailsUpdate => {
            domain.owner = Some(desired.contact_owner.clone());
        }
    }

    request
}

/// Whether an order type gets the registration special cases
pub fn takes_special_cases(order_type: OrderType) -> bool {
    matches!(
        order_type,
        OrderType::Register | OrderType::OwnerChange | OrderType::RegistrantDetailsUpdate
    )
}

/// Apply the TLD rules that need no lookup
///
/// Local presence needs the policy source and is set by the engine.
pub fn apply_static_special_cases(request: &mut OrderRequest, desired: &DesiredConfig) {
    let tld = desired.tld();

    if desired.flags.hide_whois && HIDE_WHOIS_TLDS.contains(&tld) {
        request.domain.disclose_social_data = Some(false);
    }

    if TRADEMARK_COUNTRY_TLDS.contains(&tld) {
        request.domain.trademark_country = desired.contact_owner.country_code.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyFlags;
    use crate::model::Contact;

    fn desired(domain: &str, hide_whois: bool) -> DesiredConfig {
        DesiredConfig {
            domain: domain.to_string(),
            nameservers: vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()],
            contact_owner: Contact {
                country_code: Some("IT".to_string()),
                ..Default::default()
            },
            contact_admin: Contact::default(),
            contact_tech: Contact::default(),
            contact_billing: Contact::default(),
            flags: PolicyFlags {
                hide_whois,
                ..Default::default()
            },
        }
    }

    #[test]
    fn contact_update_carries_three_roles() {
        let request = build(OrderType::ContactUpdate, &desired("example.com", false));
        assert!(request.domain.owner.is_none());
        assert!(request.domain.admin.is_some());
        assert!(request.domain.tech.is_some());
        assert!(request.domain.billing.is_some());
        assert!(request.domain.name_servers.is_none());
    }

    #[test]
    fn whois_hidden_only_where_supported() {
        let mut com = build(OrderType::Register, &desired("example.com", true));
        apply_static_special_cases(&mut com, &desired("example.com", true));
        assert_eq!(com.domain.disclose_social_data, Some(false));

        let mut net = build(OrderType::Register, &desired("example.net", true));
        apply_static_special_cases(&mut net, &desired("example.net", true));
        assert_eq!(net.domain.disclose_social_data, None);
    }

    #[test]
    fn it_domains_get_trademark_country() {
        let config = desired("example.it", false);
        let mut request = build(OrderType::OwnerChange, &config);
        apply_static_special_cases(&mut request, &config);
        assert_eq!(request.domain.trademark_country.as_deref(), Some("IT"));
    }
}
