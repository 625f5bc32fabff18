//! Authorization mediation for reads of another identity's data.
//!
//! [`mediate`] makes the full decision, keeping "forbidden" and "not found"
//! apart. A [`DisclosurePolicy`] then decides how much of that the caller
//! gets to see.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::session::{authorize_self_or_admin, Access};

/// Outcome of a mediated read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden,
    NotFound,
}

/// How a `NotFound` decision is shown to the requester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisclosurePolicy {
    /// Decisions pass through unchanged.
    Reveal,
    /// Non-admins see `Forbidden` where the target does not exist, so they
    /// cannot probe for accounts or records.
    #[default]
    Conceal,
}

impl DisclosurePolicy {
    /// Apply the policy to a decision made for `requester`.
    pub fn disclose(&self, requester: &Identity, decision: Decision) -> Decision {
        match (self, decision) {
            (Self::Conceal, Decision::NotFound) if !requester.is_admin() => Decision::Forbidden,
            _ => decision,
        }
    }
}

/// Decide whether `requester` may read data owned by `target_email`.
///
/// Absence is checked first: a missing target is `NotFound` for everyone.
pub fn mediate(requester: &Identity, target_email: &str, target_exists: bool) -> Decision {
    if !target_exists {
        return Decision::NotFound;
    }
    match authorize_self_or_admin(requester, target_email) {
        Access::Allow => Decision::Allow,
        Access::Forbidden => Decision::Forbidden,
    }
}
