//! TechHive Auth — stateless bearer-token issuance and verification.
//!
//! Tokens are self-contained signed claims; no server-side session
//! state exists. A token is valid until its embedded expiry.

mod config;
mod error;
mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use token::{IdentityClaims, ValidatedIdentity, issue_token, verify_token};
