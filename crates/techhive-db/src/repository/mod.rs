//! SurrealDB repository implementations.

mod coupon;
mod product;
mod report;
mod review;
mod user;

pub use coupon::SurrealCouponRepository;
pub use product::SurrealProductRepository;
pub use report::SurrealReportRepository;
pub use review::SurrealReviewRepository;
pub use user::SurrealUserRepository;
