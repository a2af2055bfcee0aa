//! TechHive Database — SurrealDB connection management and repository
//! implementations.
//!
//! This crate provides:
//! - Connection bootstrap ([`connect`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - SurrealDB implementations of the `techhive-core` repository traits

mod connection;
mod error;
mod schema;

pub mod repository;

pub use connection::{DbConfig, connect};
pub use error::DbError;
pub use schema::run_migrations;
