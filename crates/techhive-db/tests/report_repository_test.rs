//! Integration tests for the Report repository: per-pair uniqueness
//! and resolution cleanup.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use techhive_core::error::HiveError;
use techhive_core::models::report::CreateReport;
use techhive_core::repository::ReportRepository;
use techhive_db::repository::SurrealReportRepository;
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    techhive_db::run_migrations(&db).await.unwrap();
    db
}

fn report(product_id: Uuid, reporter: &str) -> CreateReport {
    CreateReport {
        product_id,
        product_name: "Suspicious Widget".into(),
        reported_by: reporter.into(),
    }
}

#[tokio::test]
async fn report_snapshots_product_name() {
    let repo = SurrealReportRepository::new(setup().await);
    let product_id = Uuid::new_v4();

    let created = repo.create(report(product_id, "bob@x.com")).await.unwrap();

    assert_eq!(created.product_id, product_id);
    assert_eq!(created.product_name, "Suspicious Widget");
    assert_eq!(created.reported_by, "bob@x.com");
}

#[tokio::test]
async fn same_pair_cannot_report_twice() {
    let repo = SurrealReportRepository::new(setup().await);
    let product_id = Uuid::new_v4();

    repo.create(report(product_id, "bob@x.com")).await.unwrap();
    let err = repo
        .create(report(product_id, "bob@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, HiveError::DuplicateReport));
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn different_reporters_may_report_same_product() {
    let repo = SurrealReportRepository::new(setup().await);
    let product_id = Uuid::new_v4();

    repo.create(report(product_id, "bob@x.com")).await.unwrap();
    repo.create(report(product_id, "carol@x.com"))
        .await
        .unwrap();

    assert_eq!(repo.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn same_reporter_may_report_different_products() {
    let repo = SurrealReportRepository::new(setup().await);

    repo.create(report(Uuid::new_v4(), "bob@x.com"))
        .await
        .unwrap();
    repo.create(report(Uuid::new_v4(), "bob@x.com"))
        .await
        .unwrap();

    assert_eq!(repo.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_by_product_purges_only_that_product() {
    let repo = SurrealReportRepository::new(setup().await);
    let target = Uuid::new_v4();
    let other = Uuid::new_v4();

    repo.create(report(target, "bob@x.com")).await.unwrap();
    repo.create(report(target, "carol@x.com")).await.unwrap();
    repo.create(report(other, "bob@x.com")).await.unwrap();

    let removed = repo.delete_by_product(target).await.unwrap();
    assert_eq!(removed, 2);

    let remaining = repo.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].product_id, other);
}

#[tokio::test]
async fn delete_by_product_with_no_reports_removes_nothing() {
    let repo = SurrealReportRepository::new(setup().await);

    let removed = repo.delete_by_product(Uuid::new_v4()).await.unwrap();
    assert_eq!(removed, 0);
}
