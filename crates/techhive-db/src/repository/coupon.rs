//! SurrealDB implementation of [`CouponRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use techhive_core::error::{HiveError, HiveResult};
use techhive_core::models::coupon::{Coupon, CreateCoupon, UpdateCoupon};
use techhive_core::repository::CouponRepository;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CouponRow {
    code: String,
    discount: f64,
    expiry_date: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CouponRowWithId {
    record_id: String,
    code: String,
    discount: f64,
    expiry_date: DateTime<Utc>,
}

impl CouponRow {
    fn into_coupon(self, id: Uuid) -> Coupon {
        Coupon {
            id,
            code: self.code,
            discount: self.discount,
            expiry_date: self.expiry_date,
        }
    }
}

impl CouponRowWithId {
    fn try_into_coupon(self) -> Result<Coupon, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Coupon {
            id,
            code: self.code,
            discount: self.discount,
            expiry_date: self.expiry_date,
        })
    }
}

/// SurrealDB implementation of the Coupon repository.
pub struct SurrealCouponRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealCouponRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealCouponRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CouponRepository for SurrealCouponRepository<C> {
    async fn create(&self, input: CreateCoupon) -> HiveResult<Coupon> {
        if self.get_by_code(&input.code).await?.is_some() {
            return Err(HiveError::AlreadyExists {
                entity: "coupon".into(),
            });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('coupon', $id) SET \
                 code = $code, \
                 discount = $discount, \
                 expiry_date = $expiry_date",
            )
            .bind(("id", id_str.clone()))
            .bind(("code", input.code))
            .bind(("discount", input.discount))
            .bind(("expiry_date", input.expiry_date))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|_| DbError::Conflict {
            entity: "coupon".into(),
        })?;

        let rows: Vec<CouponRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "coupon".into(),
            id: id_str,
        })?;

        Ok(row.into_coupon(id))
    }

    async fn get_by_code(&self, code: &str) -> HiveResult<Option<Coupon>> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM coupon WHERE code = $code")
            .bind(("code", code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CouponRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_coupon().map_err(HiveError::from)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> HiveResult<Vec<Coupon>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM coupon \
                 ORDER BY expiry_date ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CouponRowWithId> = result.take(0).map_err(DbError::from)?;
        let coupons = rows
            .into_iter()
            .map(|row| row.try_into_coupon())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(coupons)
    }

    async fn update(&self, id: Uuid, input: UpdateCoupon) -> HiveResult<Coupon> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.code.is_some() {
            sets.push("code = $code");
        }
        if input.discount.is_some() {
            sets.push("discount = $discount");
        }
        if input.expiry_date.is_some() {
            sets.push("expiry_date = $expiry_date");
        }

        let query = if sets.is_empty() {
            "UPDATE type::record('coupon', $id)".to_string()
        } else {
            format!("UPDATE type::record('coupon', $id) SET {}", sets.join(", "))
        };

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(code) = input.code {
            builder = builder.bind(("code", code));
        }
        if let Some(discount) = input.discount {
            builder = builder.bind(("discount", discount));
        }
        if let Some(expiry_date) = input.expiry_date {
            builder = builder.bind(("expiry_date", expiry_date));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CouponRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "coupon".into(),
            id: id_str,
        })?;

        Ok(row.into_coupon(id))
    }

    async fn delete(&self, id: Uuid) -> HiveResult<()> {
        self.db
            .query("DELETE type::record('coupon', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
