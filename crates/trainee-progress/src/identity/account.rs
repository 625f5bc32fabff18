//! Identity records, roles, and registration validation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Role of an identity. Admins may read every trainee's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Trainee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trainee => "Trainee",
            Self::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Trainee" => Ok(Self::Trainee),
            "Admin" => Ok(Self::Admin),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

/// A registered identity as held by the identity store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Natural key, unique across the store.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub role: Role,
    /// Display name printed on reports.
    pub name: String,
    /// Registration timestamp (microseconds since epoch).
    pub created_at: u64,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The identity without its password hash.
    pub fn profile(&self) -> Profile {
        Profile {
            email: self.email.clone(),
            role: self.role,
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Public view of an identity, safe to hand to any authorized caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub created_at: u64,
}

/// Check that `email` looks like a deliverable address.
///
/// Requires exactly one `@`, a non-empty local part, and a dotted domain
/// with no empty labels. Whitespace anywhere is rejected.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Canonical form of an email address: the domain is case-insensitive and
/// lowercased, the local part is kept as typed.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Validate registration input before anything is hashed or stored.
pub fn validate_registration(email: &str, password: &str, name: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}
