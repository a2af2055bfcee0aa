//! Integration tests for the Product repository: lifecycle, listings,
//! and the voting invariant.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use techhive_core::error::HiveError;
use techhive_core::models::product::{
    AcceptedQuery, CreateProduct, ModerationUpdate, ProductStatus, SortOrder, UpdateProductDetails,
};
use techhive_core::repository::ProductRepository;
use techhive_db::repository::SurrealProductRepository;
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    techhive_db::run_migrations(&db).await.unwrap();
    db
}

fn submission(owner: &str, name: &str, tags: &[&str]) -> CreateProduct {
    CreateProduct {
        owner_email: owner.into(),
        name: name.into(),
        image: "https://img.example/p.png".into(),
        description: "A product".into(),
        external_link: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn new_submissions_start_pending_with_no_votes() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("alice@x.com", "Widget", &["tools"]))
        .await
        .unwrap();

    assert_eq!(product.status, ProductStatus::Pending);
    assert!(!product.featured);
    assert_eq!(product.upvote_count, 0);
    assert!(product.voted_users.is_empty());

    let fetched = repo.get_by_id(product.id).await.unwrap();
    assert_eq!(fetched.name, "Widget");
}

#[tokio::test]
async fn get_unknown_product_is_not_found() {
    let repo = SurrealProductRepository::new(setup().await);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, HiveError::NotFound { .. }));
}

#[tokio::test]
async fn list_filters_by_owner() {
    let repo = SurrealProductRepository::new(setup().await);

    repo.create(submission("alice@x.com", "A1", &[]))
        .await
        .unwrap();
    repo.create(submission("alice@x.com", "A2", &[]))
        .await
        .unwrap();
    repo.create(submission("bob@x.com", "B1", &[]))
        .await
        .unwrap();

    assert_eq!(repo.list(None).await.unwrap().len(), 3);
    assert_eq!(repo.list(Some("alice@x.com")).await.unwrap().len(), 2);
    assert_eq!(repo.list(Some("nobody@x.com")).await.unwrap().len(), 0);
}

#[tokio::test]
async fn accepted_listing_paginates_at_six() {
    let repo = SurrealProductRepository::new(setup().await);

    for i in 0..8 {
        let product = repo
            .create(submission("owner@x.com", &format!("P{i}"), &[]))
            .await
            .unwrap();
        // Accept all but the last one.
        if i < 7 {
            repo.moderate(
                product.id,
                ModerationUpdate {
                    status: Some(ProductStatus::Accepted),
                    featured: None,
                },
            )
            .await
            .unwrap();
        }
    }

    let first = repo
        .list_accepted(AcceptedQuery {
            page: 1,
            search: None,
            sort: SortOrder::Desc,
        })
        .await
        .unwrap();
    assert_eq!(first.products.len(), 6);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.current_page, 1);
    assert!(
        first
            .products
            .iter()
            .all(|p| p.status == ProductStatus::Accepted)
    );

    let second = repo
        .list_accepted(AcceptedQuery {
            page: 2,
            search: None,
            sort: SortOrder::Desc,
        })
        .await
        .unwrap();
    assert_eq!(second.products.len(), 1);
    assert_eq!(second.current_page, 2);
}

#[tokio::test]
async fn accepted_listing_matches_tags_case_insensitively() {
    let repo = SurrealProductRepository::new(setup().await);

    let tagged = repo
        .create(submission("owner@x.com", "AI Tool", &["AI", "Productivity"]))
        .await
        .unwrap();
    let other = repo
        .create(submission("owner@x.com", "Game", &["gaming"]))
        .await
        .unwrap();
    for id in [tagged.id, other.id] {
        repo.moderate(
            id,
            ModerationUpdate {
                status: Some(ProductStatus::Accepted),
                featured: None,
            },
        )
        .await
        .unwrap();
    }

    let page = repo
        .list_accepted(AcceptedQuery {
            page: 1,
            search: Some("ai".into()),
            sort: SortOrder::Desc,
        })
        .await
        .unwrap();

    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].name, "AI Tool");
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn tag_search_does_not_match_across_tag_boundaries() {
    let repo = SurrealProductRepository::new(setup().await);

    let split = repo
        .create(submission("owner@x.com", "Split", &["ab", "cd"]))
        .await
        .unwrap();
    let spaced = repo
        .create(submission("owner@x.com", "Spaced", &["machine learning"]))
        .await
        .unwrap();
    for id in [split.id, spaced.id] {
        repo.moderate(
            id,
            ModerationUpdate {
                status: Some(ProductStatus::Accepted),
                featured: None,
            },
        )
        .await
        .unwrap();
    }

    // "b c" only exists if adjacent tags are glued together.
    let page = repo
        .list_accepted(AcceptedQuery {
            page: 1,
            search: Some("b c".into()),
            sort: SortOrder::Desc,
        })
        .await
        .unwrap();
    assert!(page.products.is_empty());

    // A space inside a single tag is still searchable.
    let page = repo
        .list_accepted(AcceptedQuery {
            page: 1,
            search: Some("ne lear".into()),
            sort: SortOrder::Desc,
        })
        .await
        .unwrap();
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].name, "Spaced");
}

#[tokio::test]
async fn accepted_listing_sorts_by_votes() {
    let repo = SurrealProductRepository::new(setup().await);

    let low = repo
        .create(submission("owner@x.com", "Low", &[]))
        .await
        .unwrap();
    let high = repo
        .create(submission("owner@x.com", "High", &[]))
        .await
        .unwrap();
    for id in [low.id, high.id] {
        repo.moderate(
            id,
            ModerationUpdate {
                status: Some(ProductStatus::Accepted),
                featured: None,
            },
        )
        .await
        .unwrap();
    }
    repo.cast_vote(high.id, "v1@x.com").await.unwrap();
    repo.cast_vote(high.id, "v2@x.com").await.unwrap();
    repo.cast_vote(low.id, "v1@x.com").await.unwrap();

    let desc = repo
        .list_accepted(AcceptedQuery {
            page: 1,
            search: None,
            sort: SortOrder::Desc,
        })
        .await
        .unwrap();
    assert_eq!(desc.products[0].name, "High");

    let asc = repo
        .list_accepted(AcceptedQuery {
            page: 1,
            search: None,
            sort: SortOrder::Asc,
        })
        .await
        .unwrap();
    assert_eq!(asc.products[0].name, "Low");
}

#[tokio::test]
async fn featured_listing_caps_at_four_newest() {
    let repo = SurrealProductRepository::new(setup().await);

    for i in 0..5 {
        let product = repo
            .create(submission("owner@x.com", &format!("F{i}"), &[]))
            .await
            .unwrap();
        repo.moderate(
            product.id,
            ModerationUpdate {
                status: None,
                featured: Some(true),
            },
        )
        .await
        .unwrap();
    }
    repo.create(submission("owner@x.com", "Plain", &[]))
        .await
        .unwrap();

    let featured = repo.list_featured().await.unwrap();
    assert_eq!(featured.len(), 4);
    assert!(featured.iter().all(|p| p.featured));
}

#[tokio::test]
async fn trending_listing_ranks_by_votes_across_statuses() {
    let repo = SurrealProductRepository::new(setup().await);

    let popular = repo
        .create(submission("owner@x.com", "Popular", &[]))
        .await
        .unwrap();
    repo.create(submission("owner@x.com", "Quiet", &[]))
        .await
        .unwrap();
    repo.cast_vote(popular.id, "v1@x.com").await.unwrap();

    // Still Pending; trending ignores status.
    let trending = repo.list_trending().await.unwrap();
    assert_eq!(trending[0].name, "Popular");
    assert_eq!(trending[0].upvote_count, 1);
}

#[tokio::test]
async fn update_details_leaves_moderation_fields_alone() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("owner@x.com", "Old name", &["old"]))
        .await
        .unwrap();
    repo.moderate(
        product.id,
        ModerationUpdate {
            status: Some(ProductStatus::Accepted),
            featured: Some(true),
        },
    )
    .await
    .unwrap();

    let updated = repo
        .update_details(
            product.id,
            UpdateProductDetails {
                name: Some("New name".into()),
                tags: Some(vec!["new".into()]),
                ..UpdateProductDetails::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "New name");
    assert_eq!(updated.tags, vec!["new".to_string()]);
    assert_eq!(updated.description, "A product");
    assert_eq!(updated.status, ProductStatus::Accepted);
    assert!(updated.featured);
}

#[tokio::test]
async fn empty_moderation_update_is_a_no_op() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("owner@x.com", "Widget", &[]))
        .await
        .unwrap();

    let unchanged = repo
        .moderate(product.id, ModerationUpdate::default())
        .await
        .unwrap();

    assert_eq!(unchanged.status, ProductStatus::Pending);
    assert!(!unchanged.featured);
}

#[tokio::test]
async fn vote_count_tracks_voter_set() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("owner@x.com", "Widget", &[]))
        .await
        .unwrap();

    let voted = repo.cast_vote(product.id, "fan@x.com").await.unwrap();
    assert_eq!(voted.upvote_count, 1);
    assert_eq!(voted.voted_users, vec!["fan@x.com".to_string()]);
    assert_eq!(voted.upvote_count as usize, voted.voted_users.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_keep_count_and_voter_set_in_sync() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("owner@x.com", "Widget", &[]))
        .await
        .unwrap();

    // Five distinct voters plus three racing attempts by one voter.
    let mut tasks = Vec::new();
    for i in 0..5 {
        let repo = repo.clone();
        let id = product.id;
        tasks.push(tokio::spawn(async move {
            repo.cast_vote(id, &format!("voter{i}@x.com")).await
        }));
    }
    for _ in 0..3 {
        let repo = repo.clone();
        let id = product.id;
        tasks.push(tokio::spawn(async move {
            repo.cast_vote(id, "dup@x.com").await
        }));
    }

    let mut successes: u32 = 0;
    let mut dup_successes = 0;
    let mut dup_rejections = 0;
    for (i, task) in tasks.into_iter().enumerate() {
        match task.await.unwrap() {
            Ok(_) => {
                successes += 1;
                if i >= 5 {
                    dup_successes += 1;
                }
            }
            Err(HiveError::DuplicateVote) if i >= 5 => dup_rejections += 1,
            Err(e) => panic!("unexpected vote failure: {e}"),
        }
    }

    assert_eq!(dup_successes, 1);
    assert_eq!(dup_rejections, 2);

    let after = repo.get_by_id(product.id).await.unwrap();
    assert_eq!(after.upvote_count as usize, after.voted_users.len());
    assert_eq!(after.upvote_count, successes);
    assert_eq!(
        after
            .voted_users
            .iter()
            .filter(|v| *v == "dup@x.com")
            .count(),
        1
    );
}

#[tokio::test]
async fn owner_cannot_vote_own_product() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("owner@x.com", "Widget", &[]))
        .await
        .unwrap();

    let err = repo.cast_vote(product.id, "owner@x.com").await.unwrap_err();
    assert!(matches!(err, HiveError::SelfVoteForbidden));
    assert_eq!(repo.get_by_id(product.id).await.unwrap().upvote_count, 0);
}

#[tokio::test]
async fn second_vote_by_same_user_is_rejected() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("owner@x.com", "Widget", &[]))
        .await
        .unwrap();

    repo.cast_vote(product.id, "fan@x.com").await.unwrap();
    let err = repo.cast_vote(product.id, "fan@x.com").await.unwrap_err();
    assert!(matches!(err, HiveError::DuplicateVote));

    let after = repo.get_by_id(product.id).await.unwrap();
    assert_eq!(after.upvote_count, 1);
    assert_eq!(after.voted_users.len(), 1);
}

#[tokio::test]
async fn vote_on_unknown_product_is_not_found() {
    let repo = SurrealProductRepository::new(setup().await);

    let err = repo.cast_vote(Uuid::new_v4(), "fan@x.com").await.unwrap_err();
    assert!(matches!(err, HiveError::NotFound { .. }));
}

#[tokio::test]
async fn counts_by_owner_and_status() {
    let repo = SurrealProductRepository::new(setup().await);

    let a = repo
        .create(submission("alice@x.com", "A", &[]))
        .await
        .unwrap();
    repo.create(submission("alice@x.com", "B", &[]))
        .await
        .unwrap();
    repo.create(submission("bob@x.com", "C", &[]))
        .await
        .unwrap();
    repo.moderate(
        a.id,
        ModerationUpdate {
            status: Some(ProductStatus::Accepted),
            featured: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(repo.count_total().await.unwrap(), 3);
    assert_eq!(repo.count_by_owner("alice@x.com").await.unwrap(), 2);
    assert_eq!(
        repo.count_by_status(ProductStatus::Accepted).await.unwrap(),
        1
    );
    assert_eq!(
        repo.count_by_status(ProductStatus::Pending).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn delete_removes_product() {
    let repo = SurrealProductRepository::new(setup().await);

    let product = repo
        .create(submission("owner@x.com", "Widget", &[]))
        .await
        .unwrap();

    repo.delete(product.id).await.unwrap();

    let err = repo.get_by_id(product.id).await.unwrap_err();
    assert!(matches!(err, HiveError::NotFound { .. }));
}
