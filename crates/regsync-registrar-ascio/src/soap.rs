//! SOAP 1.1 request bodies for the ASCIO v3 API
//!
//! Bodies are built as strings with every text value escaped. The security
//! header is only added by [`envelope`], so a body can be logged as is.

use quick_xml::escape::escape;
use regsync_core::Credentials;
use regsync_core::model::{Contact, ContactRole, NameServers};
use regsync_core::traits::{DomainQuery, OrderRequest};

/// Namespace of the v3 service
pub const ASCIO_NS: &str = "http://www.ascio.com/2013/02";

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Request type of domain orders
pub const DOMAIN_ORDER_REQUEST_TYPE: &str = "v3:DomainOrderRequest";

/// Quality level sent with availability queries
const AVAILABILITY_QUALITY: &str = "QualityTest";

/// `SOAPAction` header value for a method
pub fn soap_action(method: &str) -> String {
    format!("{}/IAscioService/{}", ASCIO_NS, method)
}

/// Element writer producing `v3:`-prefixed markup
#[derive(Debug, Default)]
struct Body {
    out: String,
}

impl Body {
    fn open(&mut self, name: &str) {
        self.out.push_str("<v3:");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn open_typed(&mut self, name: &str, xsi_type: &str) {
        self.out.push_str("<v3:");
        self.out.push_str(name);
        self.out.push_str(" xsi:type=\"");
        self.out.push_str(&escape(xsi_type));
        self.out.push_str("\">");
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</v3:");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn text(&mut self, name: &str, value: &str) {
        self.open(name);
        self.out.push_str(&escape(value));
        self.close(name);
    }

    fn opt_text(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.text(name, value);
        }
    }

    fn strings(&mut self, name: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        self.open(name);
        for value in values {
            self.text("string", value);
        }
        self.close(name);
    }

    fn contact(&mut self, role: ContactRole, contact: &Contact) {
        let name = role.wire_name();
        self.open(name);
        for (attribute, value) in contact.attributes() {
            self.opt_text(attribute, value);
        }
        self.close(name);
    }

    fn name_servers(&mut self, name_servers: &NameServers) {
        self.open("NameServers");
        for (position, host) in name_servers.iter() {
            let slot = format!("NameServer{}", position);
            self.open(&slot);
            self.text("HostName", host);
            self.close(&slot);
        }
        self.close("NameServers");
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Body of a `GetDomains` call
pub fn get_domains_body(query: &DomainQuery) -> String {
    let mut b = Body::default();
    b.open("GetDomains");
    b.open("request");
    b.text("OrderSort", &query.order_sort);
    b.text("Status", query.status.as_str());
    b.strings("Tlds", &query.tlds);
    b.strings("ObjectNames", &query.names);
    b.opt_text("DomainType", query.domain_type.map(|t| t.as_str()));
    b.opt_text("DomainComment", query.comment.as_deref());
    b.opt_text("ExpireFromDate", query.expire_from.as_deref());
    b.opt_text("ExpireToDate", query.expire_to.as_deref());
    b.open("PageInfo");
    b.text("PageIndex", &query.page_index.to_string());
    b.text("PageSize", &query.page_size.to_string());
    b.close("PageInfo");
    b.close("request");
    b.close("GetDomains");
    b.finish()
}

/// Body of a `CreateOrder` call
pub fn create_order_body(request: &OrderRequest) -> String {
    let domain = &request.domain;
    let mut b = Body::default();
    b.open("CreateOrder");
    b.open_typed("request", DOMAIN_ORDER_REQUEST_TYPE);
    b.text("Type", request.order_type.as_str());
    b.open("Domain");
    b.text("Name", &domain.name);

    let roles = [
        (ContactRole::Owner, &domain.owner),
        (ContactRole::Admin, &domain.admin),
        (ContactRole::Tech, &domain.tech),
        (ContactRole::Billing, &domain.billing),
    ];
    for (role, contact) in roles {
        if let Some(contact) = contact {
            b.contact(role, contact);
        }
    }

    if let Some(name_servers) = &domain.name_servers {
        b.name_servers(name_servers);
    }
    if let Some(disclose) = domain.disclose_social_data {
        b.text("DiscloseSocialData", if disclose { "true" } else { "false" });
    }
    if let Some(local_presence) = domain.local_presence {
        b.text("LocalPresence", if local_presence { "true" } else { "false" });
    }
    if let Some(country) = &domain.trademark_country {
        b.open("Trademark");
        b.text("Country", country);
        b.close("Trademark");
    }

    b.close("Domain");
    b.close("request");
    b.close("CreateOrder");
    b.finish()
}

/// Body of an `AvailabilityInfo` call
pub fn availability_info_body(domain: &str) -> String {
    let mut b = Body::default();
    b.open("AvailabilityInfo");
    b.open("request");
    b.text("DomainName", domain);
    b.text("Quality", AVAILABILITY_QUALITY);
    b.close("request");
    b.close("AvailabilityInfo");
    b.finish()
}

/// Wrap a body in an envelope carrying the security header
pub fn envelope(credentials: &Credentials, body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="{soap}" xmlns:v3="{v3}" xmlns:xsi="{xsi}">"#,
            "<soap:Header><v3:SecurityHeaderDetails>",
            "<v3:Account>{account}</v3:Account><v3:Password>{password}</v3:Password>",
            "</v3:SecurityHeaderDetails></soap:Header>",
            "<soap:Body>{body}</soap:Body></soap:Envelope>"
        ),
        soap = SOAP_ENV_NS,
        v3 = ASCIO_NS,
        xsi = XSI_NS,
        account = escape(credentials.user.as_str()),
        password = escape(credentials.password.as_str()),
        body = body,
    )
}
