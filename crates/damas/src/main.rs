use damas::{DamasError, DamasServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DamasError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("damas server starting");

    let config = ServerConfig::load();
    let server = DamasServer::builder()
        .bind(&config.listen_addr)
        .matchmaking(config.matchmaking)
        .build()
        .await?;

    server.run().await
}
