//! Review domain model. Append-only: reviews are never mutated or
//! deleted once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_image: String,
    pub description: String,
    pub rating: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub product_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_image: String,
    pub description: String,
    pub rating: u32,
}
