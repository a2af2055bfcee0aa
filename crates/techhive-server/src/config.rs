//! Environment-backed server configuration.

use std::{env, fmt::Display, str::FromStr};

use techhive_db::DbConfig;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub db: DbConfig,
    pub token_secret: String,
    pub stripe_secret_key: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "5000"),
            db: DbConfig {
                url: try_load("DB_URL", "127.0.0.1:8000"),
                namespace: try_load("DB_NAMESPACE", "techhive"),
                database: try_load("DB_DATABASE", "main"),
                username: try_load("DB_USERNAME", "root"),
                password: try_load("DB_PASSWORD", "root"),
            },
            token_secret: require("ACCESS_TOKEN_SECRET"),
            stripe_secret_key: require("STRIPE_SECRET_KEY"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    var(key).expect("Secrets misconfigured!")
}
