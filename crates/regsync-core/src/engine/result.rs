//! Reconciliation result
//!
//! Created empty per run, filled in by each phase and returned once.

use serde::Serialize;

use crate::availability::AvailabilityResult;
use crate::diff::Diff;
use crate::error::Error;
use crate::normalize::normalize;
use crate::traits::{CreateOrderResponse, OrderInfo};

/// `msg` of every failed result
pub const FAILED_MESSAGE: &str = "The registrar API returned an error!";

/// Outcome of one check or apply run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationResult {
    pub failed: bool,
    /// Current state differs from the desired one
    pub changed: bool,
    pub available: bool,
    pub premium: bool,
    pub price: Option<f64>,
    pub price_currency: Option<String>,
    /// Reference of the last order issued
    pub order: Option<OrderInfo>,
    /// The account already holds the domain
    pub owner: bool,
    pub diff: Diff,
    pub errors: Vec<String>,
    /// Last registrar result message
    pub msg: String,
}

impl ReconciliationResult {
    /// Record a failure with a fixed message
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.failed = true;
        self.errors.push(message.into());
    }

    /// Record a failure from an error value
    pub(crate) fn fail_with(&mut self, error: &Error) {
        self.failed = true;
        if let Error::Upstream { message, .. } = error {
            self.msg = message.clone();
        }
        match error {
            Error::Validation(message) => self.errors.push(message.clone()),
            other => self.errors.extend(other.messages()),
        }
    }

    /// Append a message without failing the run
    pub(crate) fn note(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn merge_availability(&mut self, availability: AvailabilityResult) {
        self.available = availability.available;
        self.premium = availability.premium;
        self.price = availability.price;
        self.price_currency = availability.currency;
        if let Some(message) = availability.message {
            self.msg = message;
        }
        if availability.failed {
            self.failed = true;
        }
        self.errors.extend(availability.errors);
    }

    pub(crate) fn merge_order(&mut self, response: CreateOrderResponse) {
        let status = response.status;
        self.msg = status.result_message.clone();

        if !status.is_success() {
            self.failed = true;
            if status.errors.is_empty() {
                self.errors.extend(status.to_error().messages());
            }
        }
        self.errors.extend(status.errors);

        if response.order.is_some() {
            self.order = response.order;
        }
    }

    /// Normalize errors and set the failure message
    pub(crate) fn finish(mut self) -> Self {
        self.errors = normalize(std::mem::take(&mut self.errors));
        if self.failed {
            self.msg = FAILED_MESSAGE.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ResponseStatus;

    #[test]
    fn finish_normalizes_and_sets_message() {
        let mut result = ReconciliationResult::default();
        result.merge_order(CreateOrderResponse {
            status: ResponseStatus {
                result_code: 500,
                result_message: "Failed".to_string(),
                errors: vec!["FO405 object pending".to_string()],
            },
            order: None,
        });
        let result = result.finish();

        assert!(result.failed);
        assert_eq!(result.msg, FAILED_MESSAGE);
        assert_eq!(
            result.errors,
            vec!["Domain is in Status PENDING => no changes can be made!".to_string()]
        );
    }

    #[test]
    fn accepted_order_is_kept() {
        let mut result = ReconciliationResult::default();
        result.merge_order(CreateOrderResponse {
            status: ResponseStatus {
                result_code: 200,
                result_message: "OK".to_string(),
                errors: Vec::new(),
            },
            order: Some(OrderInfo {
                order_id: Some("TEST-1".to_string()),
                ..Default::default()
            }),
        });
        let result = result.finish();

        assert!(!result.failed);
        assert_eq!(result.msg, "OK");
        assert_eq!(result.order.unwrap().order_id.as_deref(), Some("TEST-1"));
    }

    #[test]
    fn serializes_result_shape() {
        let json = serde_json::to_value(ReconciliationResult::default()).unwrap();
        for key in [
            "failed", "changed", "available", "premium", "price", "price_currency", "order",
            "owner", "diff", "errors", "msg",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["diff"]["before"], serde_json::json!({}));
    }
}
