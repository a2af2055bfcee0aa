//! Coupon administration and strict validation.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use surrealdb::Connection;
use techhive_core::{
    error::HiveError,
    models::{
        coupon::{Coupon, CreateCoupon, UpdateCoupon},
        user::Role,
    },
    repository::CouponRepository,
};
use techhive_payments::PaymentProcessor;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{AuthedUser, require_role},
    error::ApiError,
    state::AppState,
};

/// `GET /coupons` — public listing.
pub async fn list_coupons<C, P>(
    State(state): State<AppState<C, P>>,
) -> Result<Json<Vec<Coupon>>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.coupons.list().await?))
}

/// `POST /coupons`
pub async fn create_coupon<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Json(input): Json<CreateCoupon>,
) -> Result<Json<Coupon>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Admin).await?;
    let coupon = state.coupons.create(input).await?;
    info!(code = %coupon.code, "coupon created");
    Ok(Json(coupon))
}

/// `PUT /coupons/{id}`
pub async fn update_coupon<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCoupon>,
) -> Result<Json<Coupon>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Admin).await?;
    Ok(Json(state.coupons.update(id, input).await?))
}

/// `DELETE /coupons/{id}`
pub async fn delete_coupon<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Admin).await?;
    state.coupons.delete(id).await?;
    Ok(Json(json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponRequest {
    pub coupon_code: String,
}

/// `POST /apply-coupon` — strict validation: an unknown code and an
/// expired code are both hard errors, unlike intent creation which
/// silently ignores bad coupons.
pub async fn apply_coupon<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Json(req): Json<ApplyCouponRequest>,
) -> Result<Json<Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let coupon = state
        .coupons
        .get_by_code(&req.coupon_code)
        .await?
        .ok_or(HiveError::CouponInvalid)?;

    if !coupon.is_valid_at(Utc::now()) {
        return Err(HiveError::CouponExpired.into());
    }

    Ok(Json(json!({ "valid": true, "discount": coupon.discount })))
}
