//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use techhive_core::error::HiveResult;
use techhive_core::models::user::{CreateUser, Registration, Role, User};
use techhive_core::repository::UserRepository;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    name: Option<String>,
    role: String,
    is_subscribed: bool,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    email: String,
    name: Option<String>,
    role: String,
    is_subscribed: bool,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
}

pub(crate) fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "none" => Ok(Role::None),
        "moderator" => Ok(Role::Moderator),
        "admin" => Ok(Role::Admin),
        other => Err(DbError::Migration(format!("unknown role: {other}"))),
    }
}

pub(crate) fn role_to_string(role: Role) -> &'static str {
    match role {
        Role::None => "none",
        Role::Moderator => "moderator",
        Role::Admin => "admin",
    }
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            email: self.email,
            name: self.name,
            role: parse_role(&self.role)?,
            is_subscribed: self.is_subscribed,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            email: self.email,
            name: self.name,
            role: parse_role(&self.role)?,
            is_subscribed: self.is_subscribed,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the User repository.
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealUserRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn register(&self, input: CreateUser) -> HiveResult<Registration> {
        // Idempotency check: an existing email is a no-op.
        let mut existing = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", input.email.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = existing.take(0).map_err(DbError::from)?;
        if !rows.is_empty() {
            return Ok(Registration::AlreadyRegistered);
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, \
                 name = $name, \
                 role = 'none', \
                 is_subscribed = false, \
                 transaction_id = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(Registration::Created(row.into_user(id)?))
    }

    async fn get_by_id(&self, id: Uuid) -> HiveResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> HiveResult<User> {
        let email_owned = email.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email_owned}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn list(&self) -> HiveResult<Vec<User>> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user ORDER BY created_at ASC")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let users = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(users)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> HiveResult<User> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('user', $id) SET role = $role")
            .bind(("id", id_str.clone()))
            .bind(("role", role_to_string(role).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn mark_subscribed(&self, email: &str, transaction_id: &str) -> HiveResult<User> {
        // Resolve the record id first so the update is keyed.
        let user = self.get_by_email(email).await?;
        let id_str = user.id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 is_subscribed = true, \
                 transaction_id = $transaction_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("transaction_id", transaction_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(user.id)?)
    }

    async fn count(&self) -> HiveResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
