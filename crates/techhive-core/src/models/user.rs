//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Elevated role held by a user, if any.
///
/// `None` is an explicit variant rather than an absent field so role
/// checks never have to reason about missing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    None,
    Moderator,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Display name supplied at signup, if any.
    pub name: Option<String>,
    pub role: Role,
    pub is_subscribed: bool,
    /// Payment-processor transaction id recorded when the
    /// subscription was completed.
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Outcome of an idempotent registration attempt.
#[derive(Debug, Clone)]
pub enum Registration {
    Created(User),
    /// A user with this email already exists; nothing was written.
    AlreadyRegistered,
}
