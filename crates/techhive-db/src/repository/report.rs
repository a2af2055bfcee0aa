//! SurrealDB implementation of [`ReportRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use techhive_core::error::{HiveError, HiveResult};
use techhive_core::models::report::{CreateReport, Report};
use techhive_core::repository::ReportRepository;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReportRow {
    product_id: String,
    product_name: String,
    reported_by: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ReportRowWithId {
    record_id: String,
    product_id: String,
    product_name: String,
    reported_by: String,
    created_at: DateTime<Utc>,
}

impl ReportRow {
    fn into_report(self, id: Uuid) -> Result<Report, DbError> {
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Report {
            id,
            product_id,
            product_name: self.product_name,
            reported_by: self.reported_by,
            created_at: self.created_at,
        })
    }
}

impl ReportRowWithId {
    fn try_into_report(self) -> Result<Report, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Report {
            id,
            product_id,
            product_name: self.product_name,
            reported_by: self.reported_by,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Report repository.
pub struct SurrealReportRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealReportRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealReportRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ReportRepository for SurrealReportRepository<C> {
    async fn create(&self, input: CreateReport) -> HiveResult<Report> {
        let product_id_str = input.product_id.to_string();

        // At most one report per (product, reporter) pair. The unique
        // index backs this check against races.
        let mut existing = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM report \
                 WHERE product_id = $product_id AND reported_by = $reported_by",
            )
            .bind(("product_id", product_id_str.clone()))
            .bind(("reported_by", input.reported_by.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<ReportRowWithId> = existing.take(0).map_err(DbError::from)?;
        if !rows.is_empty() {
            return Err(HiveError::DuplicateReport);
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('report', $id) SET \
                 product_id = $product_id, \
                 product_name = $product_name, \
                 reported_by = $reported_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("product_id", product_id_str))
            .bind(("product_name", input.product_name))
            .bind(("reported_by", input.reported_by))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|_| HiveError::DuplicateReport)?;

        let rows: Vec<ReportRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "report".into(),
            id: id_str,
        })?;

        Ok(row.into_report(id)?)
    }

    async fn list(&self) -> HiveResult<Vec<Report>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM report \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReportRowWithId> = result.take(0).map_err(DbError::from)?;
        let reports = rows
            .into_iter()
            .map(|row| row.try_into_report())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(reports)
    }

    async fn delete_by_product(&self, product_id: Uuid) -> HiveResult<u64> {
        let product_id_str = product_id.to_string();

        // Count first, then delete (the pair is informational only).
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM report \
                 WHERE product_id = $product_id GROUP ALL",
            )
            .bind(("product_id", product_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE report WHERE product_id = $product_id")
            .bind(("product_id", product_id_str))
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
