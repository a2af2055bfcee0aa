//! Integration tests for the Coupon repository.

use chrono::{Duration, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use techhive_core::error::HiveError;
use techhive_core::models::coupon::{CreateCoupon, UpdateCoupon};
use techhive_core::repository::CouponRepository;
use techhive_db::repository::SurrealCouponRepository;
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    techhive_db::run_migrations(&db).await.unwrap();
    db
}

fn coupon(code: &str, discount: f64) -> CreateCoupon {
    CreateCoupon {
        code: code.into(),
        discount,
        expiry_date: Utc::now() + Duration::days(30),
    }
}

#[tokio::test]
async fn create_and_look_up_by_code() {
    let repo = SurrealCouponRepository::new(setup().await);

    let created = repo.create(coupon("SAVE10", 10.0)).await.unwrap();
    assert_eq!(created.code, "SAVE10");
    assert_eq!(created.discount, 10.0);

    let found = repo.get_by_code("SAVE10").await.unwrap();
    assert_eq!(found.map(|c| c.id), Some(created.id));
}

#[tokio::test]
async fn unknown_code_resolves_to_none() {
    let repo = SurrealCouponRepository::new(setup().await);

    assert!(repo.get_by_code("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_code_is_rejected() {
    let repo = SurrealCouponRepository::new(setup().await);

    repo.create(coupon("SAVE10", 10.0)).await.unwrap();
    let err = repo.create(coupon("SAVE10", 20.0)).await.unwrap_err();

    assert!(matches!(err, HiveError::AlreadyExists { .. }));
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let repo = SurrealCouponRepository::new(setup().await);

    let created = repo.create(coupon("SAVE10", 10.0)).await.unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateCoupon {
                discount: Some(15.0),
                ..UpdateCoupon::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.code, "SAVE10");
    assert_eq!(updated.discount, 15.0);
    assert_eq!(updated.expiry_date, created.expiry_date);
}

#[tokio::test]
async fn update_unknown_coupon_is_not_found() {
    let repo = SurrealCouponRepository::new(setup().await);

    let err = repo
        .update(Uuid::new_v4(), UpdateCoupon::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HiveError::NotFound { .. }));
}

#[tokio::test]
async fn delete_removes_coupon() {
    let repo = SurrealCouponRepository::new(setup().await);

    let created = repo.create(coupon("SAVE10", 10.0)).await.unwrap();
    repo.delete(created.id).await.unwrap();

    assert!(repo.get_by_code("SAVE10").await.unwrap().is_none());
    assert!(repo.list().await.unwrap().is_empty());
}
