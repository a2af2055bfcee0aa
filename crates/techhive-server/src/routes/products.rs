//! Product catalog and lifecycle: submission, listings, moderation,
//! voting.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use surrealdb::Connection;
use techhive_core::{
    error::HiveError,
    models::{
        product::{
            AcceptedPage, AcceptedQuery, CreateProduct, ModerationUpdate, Product, SortOrder,
            UpdateProductDetails,
        },
        user::Role,
    },
    repository::{ProductRepository, UserRepository},
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
pub struct OwnerFilter {
    pub email: Option<String>,
}

/// `GET /products?email=` — full listing, optionally filtered by
/// owner.
pub async fn list_products<C, P>(
    State(state): State<AppState<C, P>>,
    Query(filter): Query<OwnerFilter>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.products.list(filter.email.as_deref()).await?))
}

/// `GET /products/{id}`
pub async fn get_product<C, P>(
    State(state): State<AppState<C, P>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.products.get_by_id(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AcceptedParams {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
}

/// `GET /accepted-products?page&search&sort` — the public paginated
/// catalog.
pub async fn accepted_products<C, P>(
    State(state): State<AppState<C, P>>,
    Query(params): Query<AcceptedParams>,
) -> Result<Json<AcceptedPage>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let query = AcceptedQuery {
        page: params.page.unwrap_or(1).max(1),
        search: params.search.filter(|s| !s.is_empty()),
        sort: params.sort.unwrap_or_default(),
    };
    Ok(Json(state.products.list_accepted(query).await?))
}

/// `GET /featured-products` — top 4 featured, newest first.
pub async fn featured_products<C, P>(
    State(state): State<AppState<C, P>>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.products.list_featured().await?))
}

/// `GET /trending-products` — top 6 by upvote count.
pub async fn trending_products<C, P>(
    State(state): State<AppState<C, P>>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.products.list_trending().await?))
}

/// `POST /products` — submit a new product.
///
/// Unsubscribed users get exactly one submission; a second attempt
/// answers 402 pointing at the membership upgrade.
pub async fn submit_product<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Json(input): Json<CreateProduct>,
) -> Result<Json<Product>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let owner = state.users.get_by_email(&input.owner_email).await?;

    if !owner.is_subscribed {
        let existing = state.products.count_by_owner(&owner.email).await?;
        if existing >= 1 {
            return Err(HiveError::QuotaExceeded.into());
        }
    }

    let product = state.products.create(input).await?;
    info!(product = %product.id, owner = %product.owner_email, "product submitted");
    Ok(Json(product))
}

/// `PATCH /products/{id}` — edit descriptive fields. Status, featured
/// flag, and votes are unreachable from this path.
pub async fn edit_product<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProductDetails>,
) -> Result<Json<Product>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.products.update_details(id, input).await?))
}

/// `PATCH /products/status/{id}` — moderator decision: status and/or
/// featured flag.
pub async fn moderate_product<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ModerationUpdate>,
) -> Result<Json<Product>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Moderator).await?;
    let product = state.products.moderate(id, input).await?;
    info!(product = %product.id, status = ?product.status, "product moderated");
    Ok(Json(product))
}

/// `PATCH /upvote/{id}` — cast a vote as the token identity.
pub async fn upvote<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.products.cast_vote(id, caller.email()).await?))
}

/// `DELETE /products/{id}`
pub async fn delete_product<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    state.products.delete(id).await?;
    info!(product = %id, "product deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}
