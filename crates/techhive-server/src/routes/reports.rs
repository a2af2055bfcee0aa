//! Product reports and moderation resolution.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use surrealdb::Connection;
use techhive_core::{
    models::{
        report::{CreateReport, Report},
        user::Role,
    },
    repository::{ProductRepository, ReportRepository},
};
use techhive_payments::PaymentProcessor;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{AuthedUser, require_role},
    error::ApiError,
    state::AppState,
};

/// `GET /reported-products`
pub async fn list_reports<C, P>(
    State(state): State<AppState<C, P>>,
    _caller: AuthedUser,
) -> Result<Json<Vec<Report>>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Ok(Json(state.reports.list().await?))
}

/// `POST /report/{id}` — report a product as the token identity.
///
/// The product name is snapshotted into the report so the moderation
/// queue stays readable after the product is removed.
pub async fn report_product<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    let product = state.products.get_by_id(id).await?;

    let report = state
        .reports
        .create(CreateReport {
            product_id: product.id,
            product_name: product.name,
            reported_by: caller.email().to_string(),
        })
        .await?;

    info!(product = %id, reporter = %report.reported_by, "product reported");
    Ok(Json(report))
}

/// `DELETE /reported-products/{id}` — moderator resolution: delete the
/// product, then purge its reports. The two writes are sequential,
/// not transactional.
pub async fn resolve_report<C, P>(
    State(state): State<AppState<C, P>>,
    caller: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    require_role(&state, &caller, Role::Moderator).await?;

    state.products.delete(id).await?;
    let removed = state.reports.delete_by_product(id).await?;

    info!(product = %id, reports = removed, "reported product removed");
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
