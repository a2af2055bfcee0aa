//! HTTP route handlers, one module per resource.

pub mod coupons;
pub mod payments;
pub mod products;
pub mod reports;
pub mod reviews;
pub mod stats;
pub mod users;
