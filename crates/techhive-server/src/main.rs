//! TechHive Server — Application entry point.

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("techhive=info".parse().expect("directive")),
        )
        .json()
        .init();

    tracing::info!("Starting TechHive server...");

    techhive_server::start_server().await;

    tracing::info!("TechHive server stopped.");
}
