use anyhow::Context;

use pharmacy_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    pharmacy_observability::init(config.log_format);

    let app = pharmacy_api::app::build_app(&config).context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, seed = config.seed, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
