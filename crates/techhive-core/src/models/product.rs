//! Product domain model and catalog query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation state of a product submission.
///
/// Every product starts `Pending`; only moderators move it to
/// `Accepted` or `Rejected`, and a later moderator action may set it
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub owner_email: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub external_link: Option<String>,
    pub tags: Vec<String>,
    pub status: ProductStatus,
    pub featured: bool,
    /// Invariant: always equals `voted_users.len()`.
    pub upvote_count: u32,
    pub voted_users: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub owner_email: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub external_link: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Descriptive-field edit. Status, featured flag, and vote fields are
/// never touched through this path, regardless of caller.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDetails {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub external_link: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Moderator-only update. Both fields optional; a request touching
/// neither is a no-op write.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModerationUpdate {
    pub status: Option<ProductStatus>,
    pub featured: Option<bool>,
}

/// Sort direction for the public accepted-products listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Typed query for the paginated accepted-products listing.
///
/// Replaces the original's dynamically built document filter with
/// fixed, parameterized fields.
#[derive(Debug, Clone, Default)]
pub struct AcceptedQuery {
    /// 1-based page number.
    pub page: u32,
    /// Case-insensitive substring match against product tags.
    pub search: Option<String>,
    pub sort: SortOrder,
}

/// Fixed page size for the accepted-products listing.
pub const ACCEPTED_PAGE_SIZE: u32 = 6;

/// One page of the accepted-products listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedPage {
    pub products: Vec<Product>,
    pub total_pages: u32,
    pub current_page: u32,
}
