//! Product reviews. Append-only; nothing here mutates or deletes.

use axum::{
    Json,
    extract::{Path, State},
};
use surrealdb::Connection;
use techhive_core::{
    models::review::{CreateReview, Review},
    repository::ReviewRepository,
};
use techhive_payments::PaymentProcessor;
use uuid::Uuid;

use crate::{auth::AuthedUser, error::ApiError, state::AppState};

/// `GET /reviews/{productId}`
pub async fn list_reviews<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.reviews.list_by_product(product_id).await?))
}

/// `POST /reviews`
pub async fn create_review<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Json(input): Json<CreateReview>,
) -> Result<Json<Review>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.reviews.create(input).await?))
}
