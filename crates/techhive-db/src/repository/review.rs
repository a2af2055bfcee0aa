//! SurrealDB implementation of [`ReviewRepository`].
//!
//! Reviews are append-only; the table permissions reject updates and
//! deletes, and no such operations exist here.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use techhive_core::error::HiveResult;
use techhive_core::models::review::{CreateReview, Review};
use techhive_core::repository::ReviewRepository;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReviewRow {
    product_id: String,
    reviewer_name: String,
    reviewer_image: String,
    description: String,
    rating: u32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ReviewRowWithId {
    record_id: String,
    product_id: String,
    reviewer_name: String,
    reviewer_image: String,
    description: String,
    rating: u32,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self, id: Uuid) -> Result<Review, DbError> {
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Review {
            id,
            product_id,
            reviewer_name: self.reviewer_name,
            reviewer_image: self.reviewer_image,
            description: self.description,
            rating: self.rating,
            created_at: self.created_at,
        })
    }
}

impl ReviewRowWithId {
    fn try_into_review(self) -> Result<Review, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Review {
            id,
            product_id,
            reviewer_name: self.reviewer_name,
            reviewer_image: self.reviewer_image,
            description: self.description,
            rating: self.rating,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Review repository.
pub struct SurrealReviewRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealReviewRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealReviewRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ReviewRepository for SurrealReviewRepository<C> {
    async fn create(&self, input: CreateReview) -> HiveResult<Review> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('review', $id) SET \
                 product_id = $product_id, \
                 reviewer_name = $reviewer_name, \
                 reviewer_image = $reviewer_image, \
                 description = $description, \
                 rating = $rating",
            )
            .bind(("id", id_str.clone()))
            .bind(("product_id", input.product_id.to_string()))
            .bind(("reviewer_name", input.reviewer_name))
            .bind(("reviewer_image", input.reviewer_image))
            .bind(("description", input.description))
            .bind(("rating", input.rating))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "review".into(),
            id: id_str,
        })?;

        Ok(row.into_review(id)?)
    }

    async fn list_by_product(&self, product_id: Uuid) -> HiveResult<Vec<Review>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM review \
                 WHERE product_id = $product_id \
                 ORDER BY created_at ASC",
            )
            .bind(("product_id", product_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRowWithId> = result.take(0).map_err(DbError::from)?;
        let reviews = rows
            .into_iter()
            .map(|row| row.try_into_review())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(reviews)
    }

    async fn count(&self) -> HiveResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM review GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
