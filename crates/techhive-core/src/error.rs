//! Error types for the TechHive system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HiveError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("You cannot upvote your own product")]
    SelfVoteForbidden,

    #[error("You have already voted")]
    DuplicateVote,

    #[error("You have already reported this product")]
    DuplicateReport,

    #[error("You can add only one product. Upgrade to Membership for unlimited access.")]
    QuotaExceeded,

    #[error("Invalid coupon code!")]
    CouponInvalid,

    #[error("Coupon has expired!")]
    CouponExpired,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Payment processing failed: {0}")]
    Payment(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HiveResult<T> = Result<T, HiveError>;
