//! Response mapping
//!
//! Turns parsed SOAP responses into the typed responses of
//! `regsync_core::traits`. A fault or a missing result element is a
//! transport error; a result with a failure code is a normal response.

use regsync_core::model::{ContactRole, CurrentState, NameServers};
use regsync_core::traits::{
    AvailabilityInfoResponse, CreateOrderResponse, GetDomainsResponse, OrderInfo, PriceInfo,
    ResponseStatus,
};
use regsync_core::{Contact, Error, Result};

use crate::xml::{self, Node};

/// Reason text of a SOAP 1.1 or 1.2 fault, if the document is one
pub fn fault(document: &Node) -> Option<&str> {
    let fault = document.path(&["Envelope", "Body", "Fault"])?;
    Some(
        fault
            .text_of("faultstring")
            .or_else(|| fault.find("Text").and_then(|t| t.text.as_deref()))
            .unwrap_or("unknown fault"),
    )
}

/// `<Method>Result` element of a response document
pub fn result_node<'a>(document: &'a Node, method: &str) -> Result<&'a Node> {
    let body = document
        .path(&["Envelope", "Body"])
        .ok_or_else(|| Error::transport("Response is not a SOAP envelope"))?;

    if let Some(reason) = fault(document) {
        return Err(Error::transport(format!("SOAP fault: {}", reason)));
    }

    let response_name = format!("{}Response", method);
    let result_name = format!("{}Result", method);
    body.path(&[response_name.as_str(), result_name.as_str()])
        .ok_or_else(|| Error::transport(format!("Response has no {} element", result_name)))
}

/// Parse a raw response and return its result element
pub fn parse_result(raw: &str, method: &str) -> Result<Node> {
    let document = xml::parse(raw)?;
    result_node(&document, method).cloned()
}

fn status(result: &Node) -> Result<ResponseStatus> {
    let code = result
        .text_of("ResultCode")
        .ok_or_else(|| Error::transport("Response has no ResultCode"))?;
    let result_code = code
        .trim()
        .parse()
        .map_err(|_| Error::transport(format!("ResultCode '{}' is not a number", code)))?;

    let errors = result
        .child("Errors")
        .map(|errors| {
            errors
                .children_named("string")
                .filter_map(|s| s.text.clone())
                .collect()
        })
        .unwrap_or_default();

    Ok(ResponseStatus {
        result_code,
        result_message: result.text_of("ResultMessage").unwrap_or_default().to_string(),
        errors,
    })
}

fn contact(node: Option<&Node>) -> Contact {
    let mut contact = Contact::default();
    if let Some(node) = node {
        for child in &node.children {
            if child.nil {
                continue;
            }
            if let Some(slot) = contact.attribute_mut(&child.name) {
                *slot = child.text.clone();
            }
        }
    }
    contact
}

fn name_servers(node: Option<&Node>) -> NameServers {
    let Some(node) = node else {
        return NameServers::default();
    };
    NameServers::from_positions(node.children.iter().filter_map(|slot| {
        let position = slot.name.strip_prefix("NameServer")?.parse::<u8>().ok()?;
        Some((position, slot.text_of("HostName").map(str::to_string)))
    }))
}

fn domain_info(node: &Node) -> CurrentState {
    let mut state = CurrentState {
        domain_name: node.text_of("DomainName").unwrap_or_default().to_string(),
        status: node.text_of("Status").map(str::to_string),
        expires: node.text_of("ExpDate").map(str::to_string),
        name_servers: name_servers(node.child("NameServers")),
        ..CurrentState::default()
    };
    for role in ContactRole::ALL {
        *state.contact_mut(role) = contact(node.child(role.wire_name()));
    }
    state
}

pub fn get_domains(result: &Node) -> Result<GetDomainsResponse> {
    let status = status(result)?;
    let domains: Vec<CurrentState> = result
        .child("DomainInfos")
        .map(|infos| infos.children_named("DomainInfo").map(domain_info).collect())
        .unwrap_or_default();

    let total_count = match result.text_of("TotalCount") {
        Some(count) => count
            .trim()
            .parse()
            .map_err(|_| Error::transport(format!("TotalCount '{}' is not a number", count)))?,
        None => domains.len() as u32,
    };

    Ok(GetDomainsResponse {
        status,
        total_count,
        domains,
    })
}

pub fn create_order(result: &Node) -> Result<CreateOrderResponse> {
    let status = status(result)?;
    let order = result.child("OrderInfo").filter(|o| !o.nil).map(|info| OrderInfo {
        order_id: info.text_of("OrderId").map(str::to_string),
        status: info.text_of("Status").map(str::to_string),
        order_type: info.text_of("Type").map(str::to_string),
    });
    Ok(CreateOrderResponse { status, order })
}

pub fn availability_info(result: &Node) -> Result<AvailabilityInfoResponse> {
    let status = status(result)?;

    let mut prices = Vec::new();
    if let Some(list) = result.child("Prices") {
        for info in list.children_named("PriceInfo") {
            let Some(order_type) = info.path(&["Product", "OrderType"]).and_then(|n| n.text.clone()) else {
                continue;
            };
            let Some(raw) = info.text_of("Price") else {
                continue;
            };
            let price = raw
                .trim()
                .parse()
                .map_err(|_| Error::transport(format!("Price '{}' is not a number", raw)))?;
            prices.push(PriceInfo { order_type, price });
        }
    }

    Ok(AvailabilityInfoResponse {
        status,
        domain_type: result.text_of("DomainType").map(str::to_string),
        currency: result.text_of("Currency").map(str::to_string),
        prices,
    })
}
