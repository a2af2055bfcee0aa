//! Shared application state.

use surrealdb::{Connection, Surreal};
use techhive_auth::AuthConfig;
use techhive_db::repository::{
    SurrealCouponRepository, SurrealProductRepository, SurrealReportRepository,
    SurrealReviewRepository, SurrealUserRepository,
};
use techhive_payments::PaymentProcessor;

/// Per-request state: one repository per collection, the token
/// configuration, and the payment processor seam.
///
/// Generic over the database connection and the processor so tests
/// can run against the in-memory engine with a stubbed processor.
pub struct AppState<C: Connection, P: PaymentProcessor> {
    pub users: SurrealUserRepository<C>,
    pub products: SurrealProductRepository<C>,
    pub reviews: SurrealReviewRepository<C>,
    pub reports: SurrealReportRepository<C>,
    pub coupons: SurrealCouponRepository<C>,
    pub auth: AuthConfig,
    pub processor: P,
}

impl<C: Connection, P: PaymentProcessor> AppState<C, P> {
    pub fn new(db: Surreal<C>, auth: AuthConfig, processor: P) -> Self {
        Self {
            users: SurrealUserRepository::new(db.clone()),
            products: SurrealProductRepository::new(db.clone()),
            reviews: SurrealReviewRepository::new(db.clone()),
            reports: SurrealReportRepository::new(db.clone()),
            coupons: SurrealCouponRepository::new(db),
            auth,
            processor,
        }
    }
}

impl<C: Connection, P: PaymentProcessor + Clone> Clone for AppState<C, P> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            products: self.products.clone(),
            reviews: self.reviews.clone(),
            reports: self.reports.clone(),
            coupons: self.coupons.clone(),
            auth: self.auth.clone(),
            processor: self.processor.clone(),
        }
    }
}
