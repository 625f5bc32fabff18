//! Role checks for an authenticated requester.

use crate::error::{Result, TrackerError};
use crate::identity::Identity;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Forbidden,
}

impl Access {
    /// Convert to a `Result`, naming the denied action on failure.
    pub fn require(self, action: &str) -> Result<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Forbidden => Err(TrackerError::Forbidden(action.to_string())),
        }
    }
}

/// A requester may act on their own data; an admin may act on anyone's.
pub fn authorize_self_or_admin(requester: &Identity, target_email: &str) -> Access {
    if requester.is_admin() || requester.email == target_email {
        Access::Allow
    } else {
        Access::Forbidden
    }
}

/// Only admins pass.
pub fn authorize_admin(requester: &Identity) -> Access {
    if requester.is_admin() {
        Access::Allow
    } else {
        Access::Forbidden
    }
}
