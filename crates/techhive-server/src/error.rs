//! API error type and status mapping.
//!
//! Every failure converts to `{"message": "..."}` with a status from
//! the taxonomy: 400 conflict/validation, 401 unauthenticated, 402
//! quota, 403 forbidden, 404 absent entity, 500 upstream/database.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use techhive_auth::AuthError;
use techhive_core::error::HiveError;
use techhive_payments::PaymentError;

#[derive(Debug)]
pub struct ApiError(pub HiveError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            HiveError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            HiveError::AuthorizationDenied { .. } | HiveError::SelfVoteForbidden => {
                StatusCode::FORBIDDEN
            }
            HiveError::NotFound { .. } => StatusCode::NOT_FOUND,
            HiveError::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
            HiveError::AlreadyExists { .. }
            | HiveError::DuplicateVote
            | HiveError::DuplicateReport
            | HiveError::CouponInvalid
            | HiveError::CouponExpired
            | HiveError::Validation { .. } => StatusCode::BAD_REQUEST,
            HiveError::Database(_) | HiveError::Payment(_) | HiveError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            // Do not leak backend details to clients.
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::warn!(error = %self.0, "request failed");
                "Internal Server Error".to_string()
            }
            _ => self.0.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<HiveError> for ApiError {
    fn from(err: HiveError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        let cases = [
            (
                HiveError::AuthenticationFailed {
                    reason: "no token".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                HiveError::AuthorizationDenied {
                    reason: "not admin".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (HiveError::SelfVoteForbidden, StatusCode::FORBIDDEN),
            (
                HiveError::NotFound {
                    entity: "product".into(),
                    id: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (HiveError::QuotaExceeded, StatusCode::PAYMENT_REQUIRED),
            (HiveError::DuplicateVote, StatusCode::BAD_REQUEST),
            (HiveError::DuplicateReport, StatusCode::BAD_REQUEST),
            (HiveError::CouponInvalid, StatusCode::BAD_REQUEST),
            (HiveError::CouponExpired, StatusCode::BAD_REQUEST),
            (
                HiveError::Database("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                HiveError::Payment("declined".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }
}
