//! Coupon domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    /// Discount in whole currency units (USD).
    pub discount: f64,
    pub expiry_date: DateTime<Utc>,
}

impl Coupon {
    /// A coupon is valid while its expiry date lies in the future.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date > now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoupon {
    pub code: String,
    pub discount: f64,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoupon {
    pub code: Option<String>,
    pub discount: Option<f64>,
    pub expiry_date: Option<DateTime<Utc>>,
}
