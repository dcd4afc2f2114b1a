//! Availability and pricing check
//!
//! Never returns an error: transport failures and upstream rejections are
//! folded into [`AvailabilityResult::failed`] with the error strings kept.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::traits::{AvailabilityInfoResponse, RegistrarClient};

/// Result message the registrar uses for a free domain
pub const DOMAIN_AVAILABLE_RESULT: &str = "Available";

/// Domain type of regularly priced domains
pub const DOMAIN_TYPE_STANDARD: &str = "Standard";

/// Price line that applies to a new registration
const REGISTER_PRICE_ORDER_TYPE: &str = "Register";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailabilityResult {
    pub available: bool,
    pub premium: bool,
    pub price: Option<f64>,
    pub currency: Option<String>,
    /// Registrar result message
    pub message: Option<String>,
    pub failed: bool,
    pub errors: Vec<String>,
}

impl AvailabilityResult {
    fn from_response(response: AvailabilityInfoResponse) -> Self {
        let status = response.status;
        let mut result = Self {
            available: status.result_message == DOMAIN_AVAILABLE_RESULT,
            message: Some(status.result_message.clone()),
            ..Self::default()
        };

        if !status.is_success() {
            result.available = false;
            result.failed = true;
            result.errors = status.to_error().messages();
            return result;
        }

        result.premium = response.domain_type.as_deref() != Some(DOMAIN_TYPE_STANDARD);
        result.price = response
            .prices
            .iter()
            .rev()
            .find(|p| p.order_type == REGISTER_PRICE_ORDER_TYPE)
            .map(|p| p.price);
        result.currency = response.currency;
        result
    }
}

/// Queries availability and price of a domain
pub struct AvailabilityChecker<'a> {
    registrar: &'a dyn RegistrarClient,
}

impl<'a> AvailabilityChecker<'a> {
    pub fn new(registrar: &'a dyn RegistrarClient) -> Self {
        Self { registrar }
    }

    pub async fn check(&self, credentials: &Credentials, domain: &str) -> AvailabilityResult {
        match self.registrar.availability_info(credentials, domain).await {
            Ok(response) => {
                let result = AvailabilityResult::from_response(response);
                debug!(
                    domain,
                    available = result.available,
                    premium = result.premium,
                    price = ?result.price,
                    "Availability checked"
                );
                result
            }
            Err(e) => {
                warn!("Availability query for {} failed: {}", domain, e);
                AvailabilityResult {
                    failed: true,
                    errors: e.messages(),
                    ..AvailabilityResult::default()
                }
            }
        }
    }
}
