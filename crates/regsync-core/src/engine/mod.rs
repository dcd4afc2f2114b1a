//! Reconciliation engine
//!
//! The Reconciler converges one domain's registration towards a
//! [`DesiredConfig`]:
//! - Fetches the current record via the domain state fetcher
//! - Diffs it against the desired state
//! - Checks availability and price
//! - In apply mode, gates each implied order on TLD policy and issues it
//!
//! ## Flow
//!
//! ```text
//! Init ──▶ Fetched ──▶ NotOwned | Owned ──▶ AvailabilityChecked
//!                                                  │
//!                                   (apply only)   ▼
//!                                             PolicyGated ──▶ NoOp | Converging ──▶ Done
//! ```
//!
//! Every path ends in a [`ReconciliationResult`]; nothing is raised to the
//! caller. A transport failure ends the run where it happens. A rejected
//! order marks the run failed but later independent orders still go out.
//!
//! ## Order sequence (owned domain)
//!
//! 1. NameserverUpdate
//! 2. ContactUpdate (admin, tech, billing together)
//! 3. OwnerChange or RegistrantDetailsUpdate, skipped when a ContactUpdate
//!    went out in the same run

pub mod orders;
pub mod result;

pub use result::{FAILED_MESSAGE, ReconciliationResult};

use tracing::{debug, error, info, warn};

use crate::availability::AvailabilityChecker;
use crate::config::{Credentials, DesiredConfig, RunMode};
use crate::diff::{ChangeSet, Diff};
use crate::error::{Error, Result};
use crate::fetcher::{DomainStateFetcher, FetchOutcome};
use crate::policy::TldPolicySource;
use crate::traits::{OrderRequest, OrderType, RegistrarClient};

pub const PRICE_TOO_HIGH: &str = "Domain price was higher than you allowed it to be!";
pub const PREMIUM_NOT_ALLOWED: &str =
    "Domain is listed as 'premium' but you did not allow premium domains to be registered!";
pub const NOT_AVAILABLE: &str = "Domain is not available for registration!";
pub const CONTACTS_NOT_PERMITTED: &str = "You cannot update contact-data of this TLD.";
pub const CONTACT_OWNER_CONFLICT: &str = "The contacts and owner cannot be changed at the same time => \
     you need to run the update again after the current changes have been completed.";
pub const OWNER_DETAILS_CONFLICT: &str = "The owner cannot be changed and updated at the same time => \
     you need to run the update again after the current changes have been completed.";

/// Message for an order blocked by a documentation requirement
pub fn documentation_required_message(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::Register => {
            "Documentation is required to register this TLD! Execution can be forced."
        }
        OrderType::NameserverUpdate => {
            "Documentation is required to update nameservers for this TLD! Execution can be forced."
        }
        OrderType::ContactUpdate => {
            "Documentation is required to update the contacts for this TLD! Execution can be forced."
        }
        OrderType::OwnerChange | OrderType::RegistrantDetailsUpdate => {
            "Documentation is required to update the owner for this TLD! Execution can be forced."
        }
    }
}

/// Converges domain registrations towards a desired state
///
/// One Reconciler serves any number of runs; each run gets its own
/// [`ReconciliationResult`]. Only the policy cache outlives a run.
pub struct Reconciler {
    /// Registrar for queries and orders
    registrar: Box<dyn RegistrarClient>,

    /// Cached per-TLD policy
    policy: TldPolicySource,

    /// Account credentials passed to every remote call
    credentials: Credentials,
}

impl Reconciler {
    pub fn new(
        registrar: Box<dyn RegistrarClient>,
        policy: TldPolicySource,
        credentials: Credentials,
    ) -> Self {
        Self {
            registrar,
            policy,
            credentials,
        }
    }

    /// Observe only: fetch, diff and price
    pub async fn check(&self, desired: &DesiredConfig) -> ReconciliationResult {
        self.run(desired, RunMode::Check).await
    }

    /// Check, then issue the orders needed to converge
    pub async fn apply(&self, desired: &DesiredConfig) -> ReconciliationResult {
        self.run(desired, RunMode::Apply).await
    }

    /// Run one reconciliation in the given mode
    pub async fn run(&self, desired: &DesiredConfig, mode: RunMode) -> ReconciliationResult {
        let mut result = ReconciliationResult::default();

        match desired.normalized() {
            Ok(desired) => self.reconcile(&desired, mode, &mut result).await,
            Err(e) => {
                warn!("Rejected desired config for {}: {}", desired.domain, e);
                result.fail_with(&e);
            }
        }

        result.finish()
    }

    async fn reconcile(&self, desired: &DesiredConfig, mode: RunMode, result: &mut ReconciliationResult) {
        let domain = desired.domain.as_str();

        // Init -> Fetched
        let fetched = DomainStateFetcher::new(self.registrar.as_ref())
            .fetch(&self.credentials, domain)
            .await;
        match fetched {
            Ok(FetchOutcome::Found(current)) => {
                result.owner = true;
                result.diff = Diff::between(&current, desired);
                result.changed = result.diff.is_changed();
                debug!(domain, changed = result.changed, "Domain held by this account");
            }
            Ok(FetchOutcome::NotFound) => {
                result.changed = true;
                result.diff = Diff::not_owned(desired);
                debug!(domain, "Domain not held by this account");
            }
            Err(e) => {
                if e.is_transport() {
                    error!("Fetching {} failed: {}", domain, e);
                } else {
                    warn!("Registrar refused state query for {}: {}", domain, e);
                }
                result.fail_with(&e);
                return;
            }
        }

        // -> AvailabilityChecked
        let availability = AvailabilityChecker::new(self.registrar.as_ref())
            .check(&self.credentials, domain)
            .await;
        let availability_failed = availability.failed;
        result.merge_availability(availability);
        if availability_failed {
            return;
        }

        if mode == RunMode::Check {
            return;
        }

        if !result.changed {
            debug!(domain, "Nothing to converge");
            return;
        }

        let plan = ChangeSet::plan(
            &result.diff,
            result.owner,
            desired.flags.update_nameservers_only,
        );
        debug!(domain, orders = ?plan.orders(), "Change set");

        if let Err(e) = self.converge(desired, &plan, result).await {
            error!("Run for {} aborted: {}", domain, e);
            result.fail_with(&e);
        }
    }

    /// PolicyGated -> Converging; `Err` means a transport failure ended the run
    async fn converge(
        &self,
        desired: &DesiredConfig,
        plan: &ChangeSet,
        result: &mut ReconciliationResult,
    ) -> Result<()> {
        if plan.register {
            if self.registration_blocked(desired, result) {
                return Ok(());
            }
            if self.gate(desired, OrderType::Register, result).await {
                self.issue(desired, OrderType::Register, result).await?;
            }
            return Ok(());
        }

        if plan.nameserver_update && self.gate(desired, OrderType::NameserverUpdate, result).await {
            self.issue(desired, OrderType::NameserverUpdate, result).await?;
        }

        let mut contact_update_pending = false;
        if plan.contact_update
            && self.gate(desired, OrderType::ContactUpdate, result).await
            && self.contacts_permitted(desired, result).await
        {
            contact_update_pending = true;
            self.issue(desired, OrderType::ContactUpdate, result).await?;
        }

        if let Some(owner) = plan.owner {
            if contact_update_pending {
                warn!(domain = %desired.domain, "Owner change deferred behind contact update");
                result.note(CONTACT_OWNER_CONFLICT);
                return Ok(());
            }

            if self.gate(desired, owner.order_type, result).await {
                self.issue(desired, owner.order_type, result).await?;
                if owner.details_deferred {
                    warn!(domain = %desired.domain, "Registrant details deferred behind owner change");
                    result.note(OWNER_DETAILS_CONFLICT);
                }
            }
        }

        Ok(())
    }

    /// Price, premium and availability gates ahead of a registration
    fn registration_blocked(&self, desired: &DesiredConfig, result: &mut ReconciliationResult) -> bool {
        if let (Some(max_price), Some(price)) = (desired.flags.max_price, result.price)
            && price > max_price
        {
            warn!(domain = %desired.domain, price, max_price, "Registration price above limit");
            result.fail(PRICE_TOO_HIGH);
            return true;
        }

        if result.premium && !desired.flags.premium_allowed {
            warn!(domain = %desired.domain, "Premium registration not allowed");
            result.fail(PREMIUM_NOT_ALLOWED);
            return true;
        }

        if !result.available {
            warn!(domain = %desired.domain, "Domain not available");
            result.fail(NOT_AVAILABLE);
            return true;
        }

        false
    }

    /// Documentation gate; `false` means the order must not be issued
    async fn gate(&self, desired: &DesiredConfig, order_type: OrderType, result: &mut ReconciliationResult) -> bool {
        match self
            .policy
            .docs_required(&self.credentials, &desired.domain, order_type)
            .await
        {
            Ok(true) if !desired.flags.force => {
                warn!(domain = %desired.domain, order = %order_type, "Blocked: documentation required");
                result.fail(documentation_required_message(order_type));
                false
            }
            Ok(required) => {
                if required {
                    info!(domain = %desired.domain, order = %order_type, "Documentation requirement forced");
                }
                true
            }
            Err(e) => {
                warn!(domain = %desired.domain, order = %order_type, "Blocked: policy lookup failed: {}", e);
                result.fail_with(&policy_lookup_failed(order_type, &e));
                false
            }
        }
    }

    async fn contacts_permitted(&self, desired: &DesiredConfig, result: &mut ReconciliationResult) -> bool {
        match self
            .policy
            .contacts_permitted(&self.credentials, &desired.domain)
            .await
        {
            Ok(true) => true,
            Ok(false) => {
                warn!(domain = %desired.domain, "Blocked: TLD does not allow contact updates");
                result.fail(CONTACTS_NOT_PERMITTED);
                false
            }
            Err(e) => {
                warn!(domain = %desired.domain, "Blocked: policy lookup failed: {}", e);
                result.fail_with(&policy_lookup_failed(OrderType::ContactUpdate, &e));
                false
            }
        }
    }

    /// Build, finish and send one order
    async fn issue(
        &self,
        desired: &DesiredConfig,
        order_type: OrderType,
        result: &mut ReconciliationResult,
    ) -> Result<()> {
        let mut request = orders::build(order_type, desired);

        if orders::takes_special_cases(order_type) {
            orders::apply_static_special_cases(&mut request, desired);
            if let Err(e) = self.local_presence(desired, &mut request).await {
                warn!(domain = %desired.domain, order = %order_type, "Blocked: {}", e);
                result.fail_with(&policy_lookup_failed(order_type, &e));
                return Ok(());
            }
        }

        info!(
            domain = %desired.domain,
            order = %order_type,
            registrar = self.registrar.registrar_name(),
            "Issuing order"
        );
        let response = self
            .registrar
            .create_order(&self.credentials, &request)
            .await?;

        if response.status.is_success() {
            info!(domain = %desired.domain, order = %order_type, "Order accepted");
        } else {
            warn!(
                domain = %desired.domain,
                order = %order_type,
                code = response.status.result_code,
                "Order rejected"
            );
        }
        result.merge_order(response);
        Ok(())
    }

    async fn local_presence(&self, desired: &DesiredConfig, request: &mut OrderRequest) -> Result<()> {
        if desired.flags.allow_local_presence
            && self
                .policy
                .local_presence_offered(&self.credentials, &desired.domain)
                .await?
        {
            request.domain.local_presence = Some(true);
        }
        Ok(())
    }
}

fn policy_lookup_failed(order_type: OrderType, cause: &Error) -> Error {
    Error::policy_block(format!(
        "Could not look up TLD policy for {}: {}",
        order_type.catalog_command(),
        cause
    ))
}
