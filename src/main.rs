use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use frame::{AppConfig, AppState, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("frame=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_address = config.socket_addr()?;
    let state = AppState::new(config);

    if state.config.clean_on_start {
        let removed = state
            .storage
            .clean()
            .await
            .with_context(|| format!("cleaning {}", state.storage.base_dir().display()))?;
        tracing::info!(removed, "cleaned upload directory");
    }
    state
        .storage
        .ensure_dir()
        .await
        .with_context(|| format!("creating {}", state.storage.base_dir().display()))?;

    tracing::info!(
        upload_dir = %state.storage.base_dir().display(),
        store = %state.store.path().display(),
        max_upload_bytes = state.config.max_upload_bytes,
        "photo storage ready"
    );

    let router = build_router(state);
    let tcp_listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("Frame server started at http://{}", bind_address);

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("received Ctrl+C, shutting down");
        })
        .await?;
    Ok(())
}
