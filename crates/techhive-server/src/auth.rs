//! Request authentication and role gating.
//!
//! Authentication is an extractor: handlers that take [`AuthedUser`]
//! reject tokenless or bad-token requests with 401 before running.
//! Authorization is an explicit call: [`require_role`] does a fresh
//! user lookup on every request, so a revoked role takes effect
//! immediately even for outstanding tokens.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use surrealdb::Connection;
use techhive_auth::{ValidatedIdentity, verify_token};
use techhive_core::{
    error::HiveError,
    models::user::{Role, User},
    repository::UserRepository,
};
use techhive_payments::PaymentProcessor;

use crate::{error::ApiError, state::AppState};

/// A request identity proven by a verified bearer token.
pub struct AuthedUser(ValidatedIdentity);

impl AuthedUser {
    pub fn email(&self) -> &str {
        self.0.email()
    }
}

impl<C, P> FromRequestParts<AppState<C, P>> for AuthedUser
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C, P>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("malformed authorization header"))?;

        let identity = verify_token(token, &state.auth)?;
        Ok(Self(identity))
    }
}

fn unauthorized(reason: &str) -> ApiError {
    ApiError(HiveError::AuthenticationFailed {
        reason: reason.to_string(),
    })
}

fn forbidden() -> ApiError {
    ApiError(HiveError::AuthorizationDenied {
        reason: "forbidden access".to_string(),
    })
}

/// Look the caller up and require an exact role match. An admin does
/// not pass a moderator gate; the roles are disjoint tiers.
pub async fn require_role<C, P>(
    state: &AppState<C, P>,
    caller: &AuthedUser,
    role: Role,
) -> Result<User, ApiError>
where
    C: Connection,
    P: PaymentProcessor,
{
    let user = match state.users.get_by_email(caller.email()).await {
        Ok(user) => user,
        Err(HiveError::NotFound { .. }) => return Err(forbidden()),
        Err(e) => return Err(e.into()),
    };

    if user.role != role {
        return Err(forbidden());
    }

    Ok(user)
}
