//! Sessions: password hashing, bearer tokens, and role checks.
//!
//! Tokens are stateless. A token stays valid until its expiry; there is no
//! revocation list.

pub mod access;
pub mod authority;
pub mod token;

pub use access::{authorize_admin, authorize_self_or_admin, Access};
pub use authority::SessionAuthority;
pub use token::{BearerToken, Claims};
