use session_echo::{
    api::{create_api_router, AppContext},
    config::{Config, ServerConfig, SessionConfig},
    state::AppState,
};

pub fn test_config(ttl_hours: i64) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:3000".to_string()],
            environment: "development".to_string(),
        },
        session: SessionConfig {
            ttl_hours,
            cleanup_interval_secs: 300,
        },
    }
}

/// Binds the real router on an ephemeral port and returns its base url plus
/// a handle to the state, so tests can observe the store directly.
pub async fn spawn_server(ttl_hours: i64) -> (String, AppState) {
    let state = AppState::new(ttl_hours);
    let base_url = spawn_server_with_state(state.clone(), ttl_hours).await;
    (base_url, state)
}

pub async fn spawn_server_with_state(state: AppState, ttl_hours: i64) -> String {
    let config = test_config(ttl_hours);
    let context = AppContext { state, config };
    let app = create_api_router(context);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });

    format!("http://{}", addr)
}
