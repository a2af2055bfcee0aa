//! TechHive Core — domain models, repository traits, and error types.
//!
//! This crate has no database or HTTP dependencies; the other crates
//! implement its traits and convert into its error taxonomy.

pub mod error;
pub mod models;
pub mod repository;
