//! Integration tests for the User repository using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use techhive_core::error::HiveError;
use techhive_core::models::user::{CreateUser, Registration, Role};
use techhive_core::repository::UserRepository;
use techhive_db::repository::SurrealUserRepository;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    techhive_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn register_creates_plain_user() {
    let repo = SurrealUserRepository::new(setup().await);

    let outcome = repo
        .register(CreateUser {
            email: "alice@example.com".into(),
            name: Some("Alice".into()),
        })
        .await
        .unwrap();

    let user = match outcome {
        Registration::Created(user) => user,
        Registration::AlreadyRegistered => panic!("fresh email reported as registered"),
    };

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.name.as_deref(), Some("Alice"));
    assert_eq!(user.role, Role::None);
    assert!(!user.is_subscribed);
    assert!(user.transaction_id.is_none());
}

#[tokio::test]
async fn register_is_idempotent_by_email() {
    let repo = SurrealUserRepository::new(setup().await);

    repo.register(CreateUser {
        email: "alice@example.com".into(),
        name: None,
    })
    .await
    .unwrap();

    let second = repo
        .register(CreateUser {
            email: "alice@example.com".into(),
            name: Some("Alice again".into()),
        })
        .await
        .unwrap();

    assert!(matches!(second, Registration::AlreadyRegistered));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn get_by_email_unknown_is_not_found() {
    let repo = SurrealUserRepository::new(setup().await);

    let err = repo.get_by_email("ghost@example.com").await.unwrap_err();
    assert!(matches!(err, HiveError::NotFound { .. }));
}

#[tokio::test]
async fn set_role_promotes() {
    let repo = SurrealUserRepository::new(setup().await);

    let user = match repo
        .register(CreateUser {
            email: "mod@example.com".into(),
            name: None,
        })
        .await
        .unwrap()
    {
        Registration::Created(user) => user,
        Registration::AlreadyRegistered => unreachable!(),
    };

    let promoted = repo.set_role(user.id, Role::Moderator).await.unwrap();
    assert_eq!(promoted.role, Role::Moderator);

    let fetched = repo.get_by_email("mod@example.com").await.unwrap();
    assert_eq!(fetched.role, Role::Moderator);

    let admin = repo.set_role(user.id, Role::Admin).await.unwrap();
    assert_eq!(admin.role, Role::Admin);
}

#[tokio::test]
async fn mark_subscribed_records_transaction() {
    let repo = SurrealUserRepository::new(setup().await);

    repo.register(CreateUser {
        email: "payer@example.com".into(),
        name: None,
    })
    .await
    .unwrap();

    let user = repo
        .mark_subscribed("payer@example.com", "pi_12345")
        .await
        .unwrap();

    assert!(user.is_subscribed);
    assert_eq!(user.transaction_id.as_deref(), Some("pi_12345"));
}

#[tokio::test]
async fn list_and_count_cover_all_users() {
    let repo = SurrealUserRepository::new(setup().await);

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        repo.register(CreateUser {
            email: email.into(),
            name: None,
        })
        .await
        .unwrap();
    }

    let users = repo.list().await.unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(repo.count().await.unwrap(), 3);
}
