//! The `rendez-server` binary: a standalone session coordinator.

use rendez::{RendezError, RendezServerBuilder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), RendezError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let server = RendezServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(%addr, "listening");

    server.run().await
}
