//! Report domain model.
//!
//! At most one report exists per (product, reporter) pair. Reports
//! are deleted together with their product when a moderator resolves
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Product name snapshot taken at report time, so the report list
    /// stays readable after the product is gone.
    pub product_name: String,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateReport {
    pub product_id: Uuid,
    pub product_name: String,
    pub reported_by: String,
}
