use std::{collections::HashMap, sync::Arc};

use chrono::Duration;
use tokio::sync::RwLock;

use crate::managers::csrf;
use crate::models::session::Session;

/// In-memory session store. Owned by [`crate::state::AppState`] and cloned
/// into handlers; never a module-level singleton, so tests get isolated
/// stores for free.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl_hours: i64) -> Self {
        Self::with_ttl(Duration::hours(ttl_hours))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create_session(&self) -> Session {
        let session_id = uuid::Uuid::new_v4().to_string();
        let session = Session::new(session_id, self.ttl);

        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        session
    }

    /// Looks up a live session, refreshing its sliding expiry. Expired
    /// sessions are removed on the spot and reported as absent.
    pub async fn get_session(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(session_id) {
            if session.is_expired() {
                sessions.remove(session_id);
                return None;
            }

            session.touch(self.ttl);
            Some(session.clone())
        } else {
            None
        }
    }

    /// Marks the session as authenticated. Any non-empty username is
    /// accepted; the caller validates emptiness before getting here.
    pub async fn login(&self, session_id: &str, username: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;

        let session = sessions.get_mut(session_id)?;
        if session.is_expired() {
            sessions.remove(session_id);
            return None;
        }

        session.username = Some(username.to_string());
        session.touch(self.ttl);
        Some(session.clone())
    }

    /// Destroys the whole session record, not just the username. Returns
    /// whether a record was actually removed so logout can tell a confirmed
    /// destroy apart from a store that never had the session.
    pub async fn destroy_session(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Issues the session-bound CSRF token, generating one on first call and
    /// re-returning the same token for the rest of the session's lifetime.
    pub async fn issue_csrf_token(&self, session_id: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;

        let session = sessions.get_mut(session_id)?;
        if session.is_expired() {
            sessions.remove(session_id);
            return None;
        }

        if session.csrf_token.is_none() {
            session.csrf_token = Some(csrf::generate_token());
        }
        session.touch(self.ttl);
        session.csrf_token.clone()
    }

    pub async fn cleanup_expired_sessions(&self) -> Vec<String> {
        let mut sessions = self.sessions.write().await;
        let mut removed = Vec::new();

        sessions.retain(|session_id, session| {
            if session.is_expired() {
                removed.push(session_id.clone());
                false
            } else {
                true
            }
        });

        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let manager = SessionManager::new(24);
        let session = manager.create_session().await;

        let fetched = manager.get_session(&session.id).await.expect("session exists");
        assert_eq!(fetched.id, session.id);
        assert!(!fetched.is_authenticated());
    }

    #[tokio::test]
    async fn login_sets_username() {
        let manager = SessionManager::new(24);
        let session = manager.create_session().await;

        let updated = manager.login(&session.id, "alice").await.expect("login succeeds");
        assert_eq!(updated.username.as_deref(), Some("alice"));

        let fetched = manager.get_session(&session.id).await.expect("session exists");
        assert_eq!(fetched.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn destroy_removes_the_whole_record() {
        let manager = SessionManager::new(24);
        let session = manager.create_session().await;
        manager.login(&session.id, "alice").await.expect("login succeeds");

        assert!(manager.destroy_session(&session.id).await);
        assert!(manager.get_session(&session.id).await.is_none());
        assert!(!manager.destroy_session(&session.id).await);
    }

    #[tokio::test]
    async fn csrf_token_is_stable_per_session() {
        let manager = SessionManager::new(24);
        let session = manager.create_session().await;

        let first = manager.issue_csrf_token(&session.id).await.expect("token issued");
        let second = manager.issue_csrf_token(&session.id).await.expect("token issued");
        assert_eq!(first, second);

        let other = manager.create_session().await;
        let third = manager.issue_csrf_token(&other.id).await.expect("token issued");
        assert_ne!(first, third);
    }

    #[tokio::test]
    async fn expired_sessions_are_invisible() {
        let manager = SessionManager::new(0);
        let session = manager.create_session().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert!(manager.get_session(&session.id).await.is_none());
        assert!(manager.login(&session.id, "alice").await.is_none());
        assert!(manager.issue_csrf_token(&session.id).await.is_none());
    }

    #[tokio::test]
    async fn cleanup_reports_removed_ids() {
        let manager = SessionManager::new(0);
        let a = manager.create_session().await;
        let b = manager.create_session().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let mut removed = manager.cleanup_expired_sessions().await;
        removed.sort();
        let mut expected = vec![a.id, b.id];
        expected.sort();

        assert_eq!(removed, expected);
        assert_eq!(manager.session_count().await, 0);
    }
}
