//! Payment intent creation.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use surrealdb::Connection;
use techhive_core::repository::CouponRepository;
use techhive_payments::{PaymentProcessor, quote_charge};
use tracing::info;

use crate::{auth::AuthedUser, error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    /// Charge amount in whole currency units (USD).
    pub amount: f64,
    pub coupon_code: Option<String>,
}

/// `POST /create-payment-intent` — quote the charge and create a
/// processor intent.
///
/// Coupon handling here is lenient: an unknown or expired code simply
/// yields no discount. The strict path is `/apply-coupon`.
pub async fn create_payment_intent<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Json(req): Json<IntentRequest>,
) -> Result<Json<Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let coupon = match &req.coupon_code {
        Some(code) => state.coupons.get_by_code(code).await?,
        None => None,
    };

    let quote = quote_charge(req.amount, coupon.as_ref(), Utc::now());
    let intent = state.processor.create_intent(quote.amount_minor, "usd").await?;

    info!(
        amount_minor = quote.amount_minor,
        discount = quote.discount_applied,
        "payment intent created"
    );

    Ok(Json(json!({
        "clientSecret": intent.client_secret,
        "discountApplied": quote.discount_applied,
    })))
}
