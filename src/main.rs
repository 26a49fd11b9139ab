use anyhow::{Context, Result};
use family_map::{config::Config, router, sweeper, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "family_map=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(config.clone());

    sweeper::spawn_session_sweeper(state.clone());

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("family-map listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
