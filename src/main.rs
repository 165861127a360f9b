use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::time::interval;

use session_echo::{
    api::{create_api_router, AppContext},
    config::Config,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting session echo gateway");

    let config = Config::from_env()?;
    let state = AppState::new(config.session.ttl_hours);

    let reaper_state = state.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_secs;

    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(cleanup_interval_secs));

        loop {
            interval.tick().await;
            let removed = reaper_state.sessions.cleanup_expired_sessions().await;
            if !removed.is_empty() {
                tracing::info!("Expired {} session(s)", removed.len());
            }

            let session_count = reaper_state.sessions.session_count().await;
            let connection_count = reaper_state.connections.count();
            if session_count > 0 || connection_count > 0 {
                tracing::info!(
                    "Active sessions: {}, open echo connections: {}",
                    session_count,
                    connection_count
                );
            }
        }
    });

    let context = AppContext {
        state: state.clone(),
        config: config.clone(),
    };

    let app: Router = create_api_router(context);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Session echo gateway running on http://{}", addr);
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!("Session TTL: {}h", config.session.ttl_hours);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
