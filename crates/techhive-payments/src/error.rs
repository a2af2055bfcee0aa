//! Payment error types.

use techhive_core::error::HiveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment processor request failed: {0}")]
    Upstream(String),

    #[error("payment processor returned malformed response: {0}")]
    MalformedResponse(String),
}

impl From<PaymentError> for HiveError {
    fn from(err: PaymentError) -> Self {
        HiveError::Payment(err.to_string())
    }
}
