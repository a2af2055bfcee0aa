//! TechHive Server — HTTP/JSON API over the marketplace repositories.
//!
//! Request pipeline: bearer-token extractor (401) → explicit role
//! gate where required (403) → handler. All state lives in the
//! database; handlers are independent tokio tasks sharing one cloned
//! connection handle.

use std::time::Duration;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{delete, get, patch, post, put},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use surrealdb::Connection;
use techhive_auth::AuthConfig;
use techhive_db::{connect, run_migrations};
use techhive_payments::{PaymentProcessor, StripeClient};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use state::AppState;

/// Assemble the full route table over the given state.
pub fn router<C, P>(state: AppState<C, P>) -> Router
where
    C: Connection,
    P: PaymentProcessor + Clone + 'static,
{
    Router::new()
        .route("/", get(|| async { "TechHive server is running" }))
        .route("/jwt", post(routes::users::issue_jwt::<C, P>))
        .route("/users", post(routes::users::register::<C, P>))
        .route("/users", get(routes::users::list_users::<C, P>))
        .route("/users/subscribe", post(routes::users::subscribe::<C, P>))
        .route(
            "/users/admin/{key}",
            get(routes::users::is_admin::<C, P>).patch(routes::users::promote_admin::<C, P>),
        )
        .route(
            "/users/moderator/{key}",
            get(routes::users::is_moderator::<C, P>)
                .patch(routes::users::promote_moderator::<C, P>),
        )
        .route("/users/{email}", get(routes::users::get_user::<C, P>))
        .route("/products", get(routes::products::list_products::<C, P>))
        .route("/products", post(routes::products::submit_product::<C, P>))
        .route(
            "/accepted-products",
            get(routes::products::accepted_products::<C, P>),
        )
        .route(
            "/featured-products",
            get(routes::products::featured_products::<C, P>),
        )
        .route(
            "/trending-products",
            get(routes::products::trending_products::<C, P>),
        )
        .route(
            "/products/status/{id}",
            patch(routes::products::moderate_product::<C, P>),
        )
        .route("/products/{id}", get(routes::products::get_product::<C, P>))
        .route(
            "/products/{id}",
            patch(routes::products::edit_product::<C, P>),
        )
        .route(
            "/products/{id}",
            delete(routes::products::delete_product::<C, P>),
        )
        .route("/upvote/{id}", patch(routes::products::upvote::<C, P>))
        .route(
            "/reviews/{product_id}",
            get(routes::reviews::list_reviews::<C, P>),
        )
        .route("/reviews", post(routes::reviews::create_review::<C, P>))
        .route(
            "/reported-products",
            get(routes::reports::list_reports::<C, P>),
        )
        .route("/report/{id}", post(routes::reports::report_product::<C, P>))
        .route(
            "/reported-products/{id}",
            delete(routes::reports::resolve_report::<C, P>),
        )
        .route("/coupons", get(routes::coupons::list_coupons::<C, P>))
        .route("/coupons", post(routes::coupons::create_coupon::<C, P>))
        .route("/coupons/{id}", put(routes::coupons::update_coupon::<C, P>))
        .route(
            "/coupons/{id}",
            delete(routes::coupons::delete_coupon::<C, P>),
        )
        .route("/apply-coupon", post(routes::coupons::apply_coupon::<C, P>))
        .route(
            "/create-payment-intent",
            post(routes::payments::create_payment_intent::<C, P>),
        )
        .route(
            "/admin/statistics",
            get(routes::stats::admin_statistics::<C, P>),
        )
        .with_state(state)
}

pub async fn start_server() {
    let config = Config::load();

    let db = connect(&config.db)
        .await
        .expect("Database connection failed");
    run_migrations(&db).await.expect("Schema migration failed");

    let auth = AuthConfig {
        token_secret: config.token_secret.clone(),
        ..AuthConfig::default()
    };
    let processor = StripeClient::new(config.stripe_secret_key.clone());
    let state = AppState::new(db, auth, processor);

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state).layer(cors);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind listener");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
