//! Domain models for TechHive.
//!
//! These are the core types shared across all crates. JSON field names
//! stay camelCase so the wire surface matches the existing frontend.

pub mod coupon;
pub mod product;
pub mod report;
pub mod review;
pub mod user;
