use anyhow::Result;
use wayfarer_api::{build_app, ApiConfig};
use wayfarer_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("wayfarer_api");

    let config = ApiConfig::from_env();
    let app = build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        storage = if config.database_url.is_some() { "sqlite" } else { "memory" },
        "wayfarer api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
