use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    managers::csrf::CSRF_HEADER,
    middleware::csrf::csrf_guard,
    routes::{
        auth::{check_auth, login, logout},
        csrf::csrf_token,
        echo::ws_handler,
        health::health_check,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct AppContext {
    pub state: AppState,
    pub config: Config,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Session Echo Gateway API", version = "0.1.0"),
    paths(
        crate::routes::health::health_check,
        crate::routes::csrf::csrf_token,
        crate::routes::auth::check_auth,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::echo::ws_handler,
    ),
    components(schemas(
        crate::models::responses::ApiResponse,
        crate::models::requests::LoginRequest,
    ))
)]
struct ApiDoc;

pub fn create_api_router(context: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            context
                .config
                .server
                .cors_origins
                .iter()
                .map(|origin| origin.parse().unwrap())
                .collect::<Vec<_>>(),
        )
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::HeaderName::from_static(CSRF_HEADER),
            axum::http::header::COOKIE,
        ])
        .allow_credentials(true);

    // State-changing routes sit behind the CSRF guard; everything else is
    // freely readable.
    let protected = Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route_layer(from_fn_with_state(context.clone(), csrf_guard));

    let api = Router::new()
        .route("/csrf-token", get(csrf_token))
        .route("/check-auth", get(check_auth))
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .merge(protected)
        .layer(cors)
        .with_state(context);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
}
