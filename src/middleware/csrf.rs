use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    api::AppContext, cookie, managers::csrf::CSRF_HEADER, models::responses::ApiResponse,
};

/// Session id that passed CSRF validation, handed to the protected handler
/// through request extensions.
#[derive(Clone)]
pub struct VerifiedSession(pub String);

/// Rejects state-changing requests whose `x-csrf-token` header does not
/// match the token bound to the caller's session. Runs before the handler,
/// so a rejected request never touches session state.
pub async fn csrf_guard(
    State(context): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Response {
    let session_id = match cookie::extract_session_id(req.headers()) {
        Some(session_id) => session_id,
        None => return reject("Missing session cookie"),
    };

    let session = match context.state.sessions.get_session(&session_id).await {
        Some(session) => session,
        None => return reject("Invalid or expired session"),
    };

    let provided = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok());

    let valid = match (session.csrf_token.as_deref(), provided) {
        (Some(expected), Some(got)) => expected == got,
        _ => false,
    };

    if !valid {
        tracing::warn!(session_id = %session.id, "rejected request with bad CSRF token");
        return reject("Invalid or missing CSRF token");
    }

    req.extensions_mut().insert(VerifiedSession(session.id));
    next.run(req).await
}

fn reject(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::failure(message, 403)),
    )
        .into_response()
}
