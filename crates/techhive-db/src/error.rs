//! Database-specific error types and conversions.

use techhive_core::error::HiveError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    Conflict { entity: String },
}

impl From<DbError> for HiveError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => HiveError::NotFound { entity, id },
            DbError::Conflict { entity } => HiveError::AlreadyExists { entity },
            other => HiveError::Database(other.to_string()),
        }
    }
}
