use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};

use crate::{api::AppContext, cookie, managers::connections::ConnectionRegistry};

/// Prefix marking echoed payloads as server-originated.
const ECHO_PREFIX: &str = "Server received: ";

#[utoipa::path(
    get,
    path = "/ws",
    tag = "Echo",
    responses(
        (status = 101, description = "Upgrade to the realtime echo channel"),
    )
)]
pub async fn ws_handler(
    State(context): State<AppContext>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    // The channel is deliberately session-unaware; the cookie is only noted
    // so the coupling stays visible in the logs.
    let has_session_cookie = cookie::extract_session_id(&headers).is_some();

    ws.on_upgrade(move |socket| {
        handle_socket(socket, context.state.connections.clone(), has_session_cookie)
    })
}

async fn handle_socket(
    mut socket: WebSocket,
    registry: ConnectionRegistry,
    has_session_cookie: bool,
) {
    let connection_id = registry.register();
    tracing::info!(connection_id, "echo channel opened");
    tracing::debug!(
        connection_id,
        has_session_cookie,
        "handshake cookie presence"
    );

    // One echo per inbound text frame, same connection, transport order.
    while let Some(message) = socket.recv().await {
        match message {
            Ok(Message::Text(text)) => {
                let reply = format!("{}{}", ECHO_PREFIX, text.as_str());
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(error) => {
                tracing::debug!(connection_id, %error, "echo channel transport error");
                break;
            }
        }
    }

    registry.remove(connection_id);
    tracing::info!(connection_id, "echo channel closed");
}
