//! Admin dashboard counters.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use surrealdb::Connection;
use techhive_core::{
    models::{product::ProductStatus, user::Role},
    repository::{ProductRepository, ReviewRepository, UserRepository},
};
use techhive_payments::PaymentProcessor;

use crate::{
    auth::{AuthedUser, require_role},
    error::ApiError,
    state::AppState,
};

/// `GET /admin/statistics` — whole-collection counts for the admin
/// dashboard.
pub async fn admin_statistics<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
) -> Result<Json<Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Admin).await?;

    let total_products = state.products.count_total().await?;
    let accepted_products = state
        .products
        .count_by_status(ProductStatus::Accepted)
        .await?;
    let pending_products = state
        .products
        .count_by_status(ProductStatus::Pending)
        .await?;
    let total_reviews = state.reviews.count().await?;
    let total_users = state.users.count().await?;

    Ok(Json(json!({
        "totalProducts": total_products,
        "acceptedProducts": accepted_products,
        "pendingProducts": pending_products,
        "totalReviews": total_reviews,
        "totalUsers": total_users,
    })))
}
