//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations enforce the
//! single-document invariants (vote counting, report uniqueness);
//! cross-collection checks (submission quota, report resolution) are
//! orchestrated by the API layer.

use uuid::Uuid;

use crate::error::HiveResult;
use crate::models::{
    coupon::{Coupon, CreateCoupon, UpdateCoupon},
    product::{
        AcceptedPage, AcceptedQuery, CreateProduct, ModerationUpdate, Product, ProductStatus,
        UpdateProductDetails,
    },
    report::{CreateReport, Report},
    review::{CreateReview, Review},
    user::{CreateUser, Registration, Role, User},
};

pub trait UserRepository: Send + Sync {
    /// Idempotent by email: registering an existing email is a no-op
    /// returning [`Registration::AlreadyRegistered`].
    fn register(&self, input: CreateUser) -> impl Future<Output = HiveResult<Registration>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HiveResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = HiveResult<User>> + Send;
    fn list(&self) -> impl Future<Output = HiveResult<Vec<User>>> + Send;
    fn set_role(&self, id: Uuid, role: Role) -> impl Future<Output = HiveResult<User>> + Send;
    /// Mark the user subscribed and record the processor transaction
    /// id. The transaction is not verified against the processor.
    fn mark_subscribed(
        &self,
        email: &str,
        transaction_id: &str,
    ) -> impl Future<Output = HiveResult<User>> + Send;
    fn count(&self) -> impl Future<Output = HiveResult<u64>> + Send;
}

pub trait ProductRepository: Send + Sync {
    /// Insert a new submission in `Pending` status with zero votes.
    fn create(&self, input: CreateProduct) -> impl Future<Output = HiveResult<Product>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HiveResult<Product>> + Send;
    /// Full listing, optionally filtered by owner email.
    fn list(&self, owner: Option<&str>) -> impl Future<Output = HiveResult<Vec<Product>>> + Send;
    /// Paginated accepted-only listing (fixed page size 6), with
    /// optional tag substring filter and upvote-count sort.
    fn list_accepted(
        &self,
        query: AcceptedQuery,
    ) -> impl Future<Output = HiveResult<AcceptedPage>> + Send;
    /// Top 4 featured products, newest first.
    fn list_featured(&self) -> impl Future<Output = HiveResult<Vec<Product>>> + Send;
    /// Top 6 products by upvote count, all statuses.
    fn list_trending(&self) -> impl Future<Output = HiveResult<Vec<Product>>> + Send;
    fn update_details(
        &self,
        id: Uuid,
        input: UpdateProductDetails,
    ) -> impl Future<Output = HiveResult<Product>> + Send;
    /// Moderator transition: set status and/or the featured flag.
    fn moderate(
        &self,
        id: Uuid,
        input: ModerationUpdate,
    ) -> impl Future<Output = HiveResult<Product>> + Send;
    /// Cast a vote. Fails with `NotFound`, `SelfVoteForbidden`, or
    /// `DuplicateVote`; on success the count increment and voter-set
    /// insertion are applied as one atomic update.
    fn cast_vote(&self, id: Uuid, voter: &str)
    -> impl Future<Output = HiveResult<Product>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HiveResult<()>> + Send;
    fn count_by_owner(&self, owner: &str) -> impl Future<Output = HiveResult<u64>> + Send;
    fn count_total(&self) -> impl Future<Output = HiveResult<u64>> + Send;
    fn count_by_status(&self, status: ProductStatus)
    -> impl Future<Output = HiveResult<u64>> + Send;
}

/// Append-only: no update or delete operations exist.
pub trait ReviewRepository: Send + Sync {
    fn create(&self, input: CreateReview) -> impl Future<Output = HiveResult<Review>> + Send;
    fn list_by_product(
        &self,
        product_id: Uuid,
    ) -> impl Future<Output = HiveResult<Vec<Review>>> + Send;
    fn count(&self) -> impl Future<Output = HiveResult<u64>> + Send;
}

pub trait ReportRepository: Send + Sync {
    /// Fails with `DuplicateReport` if this reporter already reported
    /// this product.
    fn create(&self, input: CreateReport) -> impl Future<Output = HiveResult<Report>> + Send;
    fn list(&self) -> impl Future<Output = HiveResult<Vec<Report>>> + Send;
    /// Remove every report against a product; returns the number
    /// removed. Paired with product deletion during moderation
    /// resolution (the pair is not transactional).
    fn delete_by_product(&self, product_id: Uuid) -> impl Future<Output = HiveResult<u64>> + Send;
}

pub trait CouponRepository: Send + Sync {
    /// Fails with `AlreadyExists` on a duplicate code.
    fn create(&self, input: CreateCoupon) -> impl Future<Output = HiveResult<Coupon>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = HiveResult<Option<Coupon>>> + Send;
    fn list(&self) -> impl Future<Output = HiveResult<Vec<Coupon>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCoupon,
    ) -> impl Future<Output = HiveResult<Coupon>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HiveResult<()>> + Send;
}
