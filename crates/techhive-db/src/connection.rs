//! Connection bootstrap.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Connection settings for the SurrealDB instance backing the
/// marketplace. Defaults live with the rest of the environment
/// loading in the server crate.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, host:port.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

/// Open a WebSocket connection, sign in as root, and select the
/// configured namespace and database. Returns the shared handle the
/// repositories clone.
pub async fn connect(config: &DbConfig) -> Result<Surreal<Client>, DbError> {
    info!(
        url = %config.url,
        ns = %config.namespace,
        db = %config.database,
        "connecting to database"
    );

    let db = Surreal::new::<Ws>(&config.url).await?;

    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    info!("database connection ready");

    Ok(db)
}
