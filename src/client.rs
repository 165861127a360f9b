use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};

use crate::managers::csrf::CSRF_HEADER;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation error: {0}")]
    Validation(&'static str),
    #[error("no CSRF token loaded")]
    MissingCsrfToken,
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Channel(#[from] tokio_tungstenite::tungstenite::Error),
}

/// What a UI would render: a loading flag until the first auth check
/// resolves, then the authenticated flag and username as last confirmed by
/// the server. Never updated ahead of a server response.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub loading: bool,
    pub authenticated: bool,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CsrfTokenResponse {
    #[serde(rename = "csrfToken")]
    csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Programmatic counterpart of the browser page: drives the auth handshake
/// over HTTP (with a cookie jar standing in for the browser's) and owns the
/// realtime channel's lifecycle.
pub struct ClientController {
    http: reqwest::Client,
    base_url: String,
    csrf_token: Option<String>,
    view: ViewState,
}

impl ClientController {
    /// Startup runs its three operations concurrently: fetch the CSRF
    /// token, fetch the current auth status, open the echo channel. None
    /// of them blocks the others and any may fail without sinking the rest;
    /// a failure just leaves that facet in its default state.
    pub async fn connect(base_url: &str) -> Result<(Self, Option<EchoChannel>), ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let ws_url = ws_url_for(&base_url)?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        let mut view = ViewState {
            loading: true,
            ..ViewState::default()
        };

        let (token, status, channel) = tokio::join!(
            fetch_csrf_token(&http, &base_url),
            fetch_auth_status(&http, &base_url),
            EchoChannel::open(&ws_url),
        );

        let csrf_token = match token {
            Ok(token) => Some(token),
            Err(error) => {
                tracing::warn!(%error, "failed to fetch CSRF token");
                None
            }
        };

        match status {
            Ok(status) => {
                view.authenticated = status.authenticated;
                view.username = status.username;
            }
            Err(error) => tracing::warn!(%error, "failed to fetch auth status"),
        }
        // Loading ends once the auth check has resolved either way.
        view.loading = false;

        let channel = match channel {
            Ok(channel) => Some(channel),
            Err(error) => {
                tracing::warn!(%error, "failed to open echo channel");
                None
            }
        };

        Ok((
            Self {
                http,
                base_url,
                csrf_token,
                view,
            },
            channel,
        ))
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Empty usernames are rejected here, before any request goes out.
    pub async fn login(&mut self, username: &str) -> Result<ActionResponse, ClientError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ClientError::Validation("username must not be empty"));
        }

        let token = self.csrf_token.clone().ok_or(ClientError::MissingCsrfToken)?;

        let response: ActionResponse = self
            .http
            .post(format!("{}/login", self.base_url))
            .header(CSRF_HEADER, token)
            .json(&serde_json::json!({ "username": username }))
            .send()
            .await?
            .json()
            .await?;

        if response.success {
            self.view.authenticated = true;
            self.view.username = Some(username.to_string());
        }
        Ok(response)
    }

    pub async fn logout(&mut self) -> Result<ActionResponse, ClientError> {
        let token = self.csrf_token.clone().ok_or(ClientError::MissingCsrfToken)?;

        let response: ActionResponse = self
            .http
            .post(format!("{}/logout", self.base_url))
            .header(CSRF_HEADER, token)
            .send()
            .await?
            .json()
            .await?;

        if response.success {
            self.view.authenticated = false;
            self.view.username = None;
        }
        Ok(response)
    }

    pub async fn check_auth(&mut self) -> Result<AuthStatus, ClientError> {
        let status = fetch_auth_status(&self.http, &self.base_url).await?;
        self.view.authenticated = status.authenticated;
        self.view.username = status.username.clone();
        Ok(status)
    }
}

/// Client end of the realtime echo channel.
pub struct EchoChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl EchoChannel {
    pub async fn open(url: &str) -> Result<Self, ClientError> {
        let (stream, _response) = connect_async(url).await?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, message: &str) -> Result<(), ClientError> {
        self.stream
            .send(WsMessage::Text(message.to_string().into()))
            .await?;
        Ok(())
    }

    /// Next text frame from the server, or `None` once the channel closes.
    pub async fn recv(&mut self) -> Result<Option<String>, ClientError> {
        while let Some(message) = self.stream.next().await {
            match message? {
                WsMessage::Text(text) => return Ok(Some(text.as_str().to_string())),
                WsMessage::Close(_) => return Ok(None),
                _ => continue,
            }
        }
        Ok(None)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}

async fn fetch_csrf_token(http: &reqwest::Client, base_url: &str) -> Result<String, ClientError> {
    let response: CsrfTokenResponse = http
        .get(format!("{}/csrf-token", base_url))
        .send()
        .await?
        .json()
        .await?;
    Ok(response.csrf_token)
}

async fn fetch_auth_status(
    http: &reqwest::Client,
    base_url: &str,
) -> Result<AuthStatus, ClientError> {
    let response: AuthStatus = http
        .get(format!("{}/check-auth", base_url))
        .send()
        .await?
        .json()
        .await?;
    Ok(response)
}

fn ws_url_for(base_url: &str) -> Result<String, ClientError> {
    let rest = base_url
        .strip_prefix("http")
        .ok_or_else(|| ClientError::InvalidBaseUrl(base_url.to_string()))?;
    Ok(format!("ws{}/ws", rest))
}
