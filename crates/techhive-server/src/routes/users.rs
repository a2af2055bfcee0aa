//! User accounts: registration, token issuance, role queries,
//! promotion, subscription.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use surrealdb::Connection;
use techhive_auth::issue_token;
use techhive_core::{
    models::user::{CreateUser, Registration, Role, User},
    repository::UserRepository,
};
use techhive_payments::PaymentProcessor;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{AuthedUser, require_role},
    error::ApiError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /jwt` — issue a bearer token for the supplied email.
///
/// Identity is asserted by the upstream identity provider on the
/// frontend; this endpoint only mints the session token.
pub async fn issue_jwt<C, P>(
    State(state): State<AppState<C, P>>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let token = issue_token(&req.email, &state.auth)?;
    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub inserted_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /users` — idempotent registration keyed by email.
pub async fn register<C, P>(
    State(state): State<AppState<C, P>>,
    Json(input): Json<CreateUser>,
) -> Result<Json<RegisterResponse>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    match state.users.register(input).await? {
        Registration::Created(user) => {
            info!(email = %user.email, "user registered");
            Ok(Json(RegisterResponse {
                inserted_id: Some(user.id),
                message: None,
            }))
        }
        Registration::AlreadyRegistered => Ok(Json(RegisterResponse {
            inserted_id: None,
            message: Some("user already exists".to_string()),
        })),
    }
}

/// `GET /users` — admin-only listing of every account.
pub async fn list_users<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
) -> Result<Json<Vec<User>>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Admin).await?;
    Ok(Json(state.users.list().await?))
}

/// `GET /users/{email}` — fetch a single account.
pub async fn get_user<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.users.get_by_email(&email).await?))
}

/// `GET /users/admin/{email}` — role probe used by the frontend.
/// An unknown email reads as "not admin" rather than an error.
pub async fn is_admin<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Path(email): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let admin = matches!(
        state.users.get_by_email(&email).await,
        Ok(User {
            role: Role::Admin,
            ..
        })
    );
    Ok(Json(json!({ "admin": admin })))
}

/// `GET /users/moderator/{email}` — see [`is_admin`].
pub async fn is_moderator<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Path(email): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let moderator = matches!(
        state.users.get_by_email(&email).await,
        Ok(User {
            role: Role::Moderator,
            ..
        })
    );
    Ok(Json(json!({ "moderator": moderator })))
}

/// `PATCH /users/admin/{id}` — promote to admin.
pub async fn promote_admin<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Admin).await?;
    let user = state.users.set_role(id, Role::Admin).await?;
    info!(email = %user.email, "promoted to admin");
    Ok(Json(user))
}

/// `PATCH /users/moderator/{id}` — promote to moderator.
pub async fn promote_moderator<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Admin).await?;
    let user = state.users.set_role(id, Role::Moderator).await?;
    info!(email = %user.email, "promoted to moderator");
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub email: String,
    pub transaction_id: String,
}

/// `POST /users/subscribe` — record a completed membership payment.
///
/// The transaction id is stored as supplied; it is not verified
/// against the payment processor.
pub async fn subscribe<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<User>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let user = state
        .users
        .mark_subscribed(&req.email, &req.transaction_id)
        .await?;
    info!(email = %user.email, "membership activated");
    Ok(Json(user))
}
