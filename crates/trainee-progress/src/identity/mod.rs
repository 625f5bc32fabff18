//! Identities: registered trainees and admins, keyed by email.
//!
//! Identities are created once at registration and never updated or deleted
//! by this crate. The store owns them; everything else refers to an identity
//! by its email.

pub mod account;

pub use account::{
    normalize_email, validate_email, validate_registration, Identity, Profile, Role,
    MIN_PASSWORD_LEN,
};
