use axum::{
    extract::State,
    http::{header, StatusCode, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{api::AppContext, cookie, models::responses::ApiResponse};

#[utoipa::path(
    get,
    path = "/csrf-token",
    tag = "Csrf",
    responses(
        (status = 200, description = "Anti-forgery token bound to the caller's session"),
        (status = 500, description = "Token issue or cookie construction failed", body = ApiResponse),
    )
)]
pub async fn csrf_token(State(context): State<AppContext>, headers: HeaderMap) -> Response {
    let existing = match cookie::extract_session_id(&headers) {
        Some(session_id) => context.state.sessions.get_session(&session_id).await,
        None => None,
    };

    let session = match existing {
        Some(session) => session,
        None => context.state.sessions.create_session().await,
    };

    let token = match context.state.sessions.issue_csrf_token(&session.id).await {
        Some(token) => token,
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure("Failed to issue CSRF token", 500)),
            )
                .into_response()
        }
    };

    let cookie_value = cookie::session_cookie(
        &session.id,
        context.config.session.cookie_max_age_secs(),
        context.config.server.is_production(),
    );

    let mut response = Json(json!({ "csrfToken": token })).into_response();

    if let Ok(cookie_header) = cookie_value.parse() {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, cookie_header);
        response
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure("Failed to set session cookie", 500)),
        )
            .into_response()
    }
}
