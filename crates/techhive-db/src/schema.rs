//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE option<string>;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['none', 'moderator', 'admin'];
DEFINE FIELD is_subscribed ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD transaction_id ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Products
-- =======================================================================
DEFINE TABLE product SCHEMAFULL;
DEFINE FIELD owner_email ON TABLE product TYPE string;
DEFINE FIELD name ON TABLE product TYPE string;
DEFINE FIELD image ON TABLE product TYPE string;
DEFINE FIELD description ON TABLE product TYPE string;
DEFINE FIELD external_link ON TABLE product TYPE option<string>;
DEFINE FIELD tags ON TABLE product TYPE array;
DEFINE FIELD tags.* ON TABLE product TYPE string;
DEFINE FIELD status ON TABLE product TYPE string \
    ASSERT $value IN ['Pending', 'Accepted', 'Rejected'];
DEFINE FIELD featured ON TABLE product TYPE bool DEFAULT false;
DEFINE FIELD upvote_count ON TABLE product TYPE int DEFAULT 0;
DEFINE FIELD voted_users ON TABLE product TYPE array;
DEFINE FIELD voted_users.* ON TABLE product TYPE string;
DEFINE FIELD created_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_product_owner ON TABLE product COLUMNS owner_email;
DEFINE INDEX idx_product_status ON TABLE product COLUMNS status;

-- =======================================================================
-- Reviews (append-only)
-- =======================================================================
DEFINE TABLE review SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD product_id ON TABLE review TYPE string;
DEFINE FIELD reviewer_name ON TABLE review TYPE string;
DEFINE FIELD reviewer_image ON TABLE review TYPE string;
DEFINE FIELD description ON TABLE review TYPE string;
DEFINE FIELD rating ON TABLE review TYPE int;
DEFINE FIELD created_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_review_product ON TABLE review COLUMNS product_id;

-- =======================================================================
-- Reports (one per product/reporter pair)
-- =======================================================================
DEFINE TABLE report SCHEMAFULL;
DEFINE FIELD product_id ON TABLE report TYPE string;
DEFINE FIELD product_name ON TABLE report TYPE string;
DEFINE FIELD reported_by ON TABLE report TYPE string;
DEFINE FIELD created_at ON TABLE report TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_report_product_reporter ON TABLE report \
    COLUMNS product_id, reported_by UNIQUE;

-- =======================================================================
-- Coupons
-- =======================================================================
DEFINE TABLE coupon SCHEMAFULL;
DEFINE FIELD code ON TABLE coupon TYPE string;
DEFINE FIELD discount ON TABLE coupon TYPE float;
DEFINE FIELD expiry_date ON TABLE coupon TYPE datetime;
DEFINE INDEX idx_coupon_code ON TABLE coupon COLUMNS code UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
