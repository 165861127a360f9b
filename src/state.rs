use crate::managers::{connections::ConnectionRegistry, session::SessionManager};

/// Explicitly owned application state, built once in `main` (or a test) and
/// cloned into the router.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub connections: ConnectionRegistry,
}

impl AppState {
    pub fn new(session_ttl_hours: i64) -> Self {
        Self {
            sessions: SessionManager::new(session_ttl_hours),
            connections: ConnectionRegistry::new(),
        }
    }
}
