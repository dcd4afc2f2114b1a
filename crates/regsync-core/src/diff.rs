//! Desired vs. current comparison
//!
//! A [`Diff`] holds two [`DiffSnapshot`]s restricted to the compared
//! attribute set. A [`ChangeSet`] classifies the differences into the
//! orders that would converge them, before any policy gate is applied.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::DesiredConfig;
use crate::model::{Contact, ContactRole, CurrentState, NameServers, OWNER_CHANGE_ATTRIBUTES};
use crate::traits::OrderType;

/// One side of a diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSnapshot {
    pub nameservers: NameServers,
    #[serde(serialize_with = "serialize_all_attributes")]
    pub contact_owner: Contact,
    #[serde(serialize_with = "serialize_all_attributes")]
    pub contact_admin: Contact,
    #[serde(serialize_with = "serialize_all_attributes")]
    pub contact_tech: Contact,
    #[serde(serialize_with = "serialize_all_attributes")]
    pub contact_billing: Contact,
}

impl DiffSnapshot {
    pub fn from_desired(desired: &DesiredConfig) -> Self {
        Self {
            nameservers: desired.name_servers(),
            contact_owner: desired.contact_owner.clone(),
            contact_admin: desired.contact_admin.clone(),
            contact_tech: desired.contact_tech.clone(),
            contact_billing: desired.contact_billing.clone(),
        }
    }

    pub fn from_current(current: &CurrentState) -> Self {
        // Renumber so a gap in the registrar's positions is not a difference.
        Self {
            nameservers: NameServers::from_hosts(&current.name_servers.hosts()),
            contact_owner: current.owner.clone(),
            contact_admin: current.admin.clone(),
            contact_tech: current.tech.clone(),
            contact_billing: current.billing.clone(),
        }
    }

    pub fn contact(&self, role: ContactRole) -> &Contact {
        match role {
            ContactRole::Owner => &self.contact_owner,
            ContactRole::Admin => &self.contact_admin,
            ContactRole::Tech => &self.contact_tech,
            ContactRole::Billing => &self.contact_billing,
        }
    }
}

/// Every compared attribute, `null` when unset
fn serialize_all_attributes<S: Serializer>(contact: &Contact, serializer: S) -> Result<S::Ok, S::Error> {
    let attributes = contact.attributes();
    let mut map = serializer.serialize_map(Some(attributes.len()))?;
    for (name, value) in attributes {
        map.serialize_entry(name, &value)?;
    }
    map.end()
}

/// Before/after pair; an absent side serializes as `{}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diff {
    #[serde(serialize_with = "serialize_side")]
    pub before: Option<DiffSnapshot>,
    #[serde(serialize_with = "serialize_side")]
    pub after: Option<DiffSnapshot>,
}

fn serialize_side<S: Serializer>(side: &Option<DiffSnapshot>, serializer: S) -> Result<S::Ok, S::Error> {
    match side {
        Some(snapshot) => snapshot.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

impl Diff {
    /// Diff of an owned domain
    pub fn between(current: &CurrentState, desired: &DesiredConfig) -> Self {
        Self {
            before: Some(DiffSnapshot::from_current(current)),
            after: Some(DiffSnapshot::from_desired(desired)),
        }
    }

    /// Diff of a domain the account does not hold yet
    pub fn not_owned(desired: &DesiredConfig) -> Self {
        Self {
            before: None,
            after: Some(DiffSnapshot::from_desired(desired)),
        }
    }

    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }

    pub fn nameservers_changed(&self) -> bool {
        self.facet_changed(|s| &s.nameservers)
    }

    pub fn contact_changed(&self, role: ContactRole) -> bool {
        self.facet_changed(|s| s.contact(role))
    }

    /// Any of admin, tech or billing differs
    pub fn contacts_changed(&self) -> bool {
        [ContactRole::Admin, ContactRole::Tech, ContactRole::Billing]
            .into_iter()
            .any(|role| self.contact_changed(role))
    }

    /// Classify an owner difference, `None` when the owner is unchanged
    pub fn owner_change(&self) -> Option<OwnerChange> {
        let (before, after) = match (&self.before, &self.after) {
            (Some(before), Some(after)) => (&before.contact_owner, &after.contact_owner),
            _ => return None,
        };

        let changed = before.changed_attributes(after);
        if changed.is_empty() {
            return None;
        }

        let (significant, details): (Vec<&str>, Vec<&str>) = changed
            .into_iter()
            .partition(|name| OWNER_CHANGE_ATTRIBUTES.contains(name));

        Some(if significant.is_empty() {
            OwnerChange {
                order_type: OrderType::RegistrantDetailsUpdate,
                details_deferred: false,
            }
        } else {
            OwnerChange {
                order_type: OrderType::OwnerChange,
                details_deferred: !details.is_empty(),
            }
        })
    }

    fn facet_changed<T: PartialEq>(&self, facet: impl Fn(&DiffSnapshot) -> &T) -> bool {
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => facet(before) != facet(after),
            (None, None) => false,
            _ => true,
        }
    }
}

/// How an owner difference is converged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerChange {
    /// `OwnerChange` or `RegistrantDetailsUpdate`
    pub order_type: OrderType,
    /// Non-significant attributes also differ and must wait for a later run
    pub details_deferred: bool,
}

/// Orders implied by a diff, at most one per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub register: bool,
    pub nameserver_update: bool,
    pub contact_update: bool,
    pub owner: Option<OwnerChange>,
}

impl ChangeSet {
    /// Classify a diff
    ///
    /// `owned` selects between registration and updates;
    /// `nameservers_only` leaves every contact facet alone.
    pub fn plan(diff: &Diff, owned: bool, nameservers_only: bool) -> Self {
        if !owned {
            return Self {
                register: true,
                ..Self::default()
            };
        }

        let mut set = Self {
            nameserver_update: diff.nameservers_changed(),
            ..Self::default()
        };
        if !nameservers_only {
            set.contact_update = diff.contacts_changed();
            set.owner = diff.owner_change();
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        !self.register && !self.nameserver_update && !self.contact_update && self.owner.is_none()
    }

    /// Order types in issue order
    pub fn orders(&self) -> Vec<OrderType> {
        let mut orders = Vec::new();
        if self.register {
            orders.push(OrderType::Register);
        }
        if self.nameserver_update {
            orders.push(OrderType::NameserverUpdate);
        }
        if self.contact_update {
            orders.push(OrderType::ContactUpdate);
        }
        if let Some(owner) = self.owner {
            orders.push(owner.order_type);
        }
        orders
    }
}
