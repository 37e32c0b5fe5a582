use recycling_portal::{
    AppState, Config,
    api::{HttpApi, PortalApi},
    router,
    session::ClientState,
    storage::{FileStore, MemoryStore},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::{fs, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::load()?;
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let durable = FileStore::open(&config.data_path);
    info!("durable session data in {}", durable.path().display());
    let client = ClientState::new(Arc::new(durable), Arc::new(MemoryStore::default()));
    let api = HttpApi::new(config.backend_url.clone());
    match api.health().await {
        Ok(()) => info!("backend reachable at {}", api.base()),
        Err(err) => warn!("backend at {} is not responding: {err}", api.base()),
    }

    let app = router(AppState::new(api, client));
    let addr = SocketAddr::new(config.host, config.port);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
