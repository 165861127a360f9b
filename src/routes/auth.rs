use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    api::AppContext,
    cookie,
    middleware::csrf::VerifiedSession,
    models::{requests::LoginRequest, responses::ApiResponse},
};

#[utoipa::path(
    get,
    path = "/check-auth",
    tag = "Auth",
    responses(
        (status = 200, description = "Whether the caller's session carries a username"),
    )
)]
pub async fn check_auth(State(context): State<AppContext>, headers: HeaderMap) -> Response {
    // Read-only: an anonymous or missing session is a normal `false`, never
    // an error, and no session is materialized here (that is the token
    // endpoint's job).
    if let Some(session_id) = cookie::extract_session_id(&headers) {
        if let Some(session) = context.state.sessions.get_session(&session_id).await {
            if let Some(username) = session.username {
                return Json(json!({ "authenticated": true, "username": username }))
                    .into_response();
            }
        }
    }

    Json(json!({ "authenticated": false })).into_response()
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Username stored on the session", body = ApiResponse),
        (status = 400, description = "Empty username", body = ApiResponse),
        (status = 403, description = "Missing or invalid CSRF token", body = ApiResponse),
    )
)]
pub async fn login(
    State(context): State<AppContext>,
    Extension(VerifiedSession(session_id)): Extension<VerifiedSession>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let username = req.username.trim();
    if username.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure("Username is required", 400)),
        )
            .into_response();
    }

    match context.state.sessions.login(&session_id, username).await {
        Some(session) => {
            tracing::info!(session_id = %session.id, username, "user logged in");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    format!("Logged in as {}", username),
                    Value::Null,
                )),
            )
                .into_response()
        }
        // The guard saw a live session moments ago, so a miss here means the
        // store lost it underneath us.
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure("Session store rejected the login", 500)),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session destroyed", body = ApiResponse),
        (status = 403, description = "Missing or invalid CSRF token", body = ApiResponse),
        (status = 500, description = "Destroy did not confirm", body = ApiResponse),
    )
)]
pub async fn logout(
    State(context): State<AppContext>,
    Extension(VerifiedSession(session_id)): Extension<VerifiedSession>,
) -> Response {
    if !context.state.sessions.destroy_session(&session_id).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure("Error logging out", 500)),
        )
            .into_response();
    }

    tracing::info!(%session_id, "session destroyed");

    let cookie_value = cookie::expired_session_cookie(context.config.server.is_production());
    let mut response = (
        StatusCode::OK,
        Json(ApiResponse::success(
            "Logged out successfully".to_string(),
            Value::Null,
        )),
    )
        .into_response();

    if let Ok(header_value) = cookie_value.parse() {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, header_value);
    }
    response
}
