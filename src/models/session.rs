use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Server-held record tying a browser's cookie to an (optional) identity.
///
/// A session with no username is anonymous; setting the username is what
/// "logging in" means here. The CSRF token is issued at most once per
/// session lifetime and lives on the record so validation never needs a
/// second lookup table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub username: Option<String>,
    pub csrf_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: None,
            csrf_token: None,
            created_at: now,
            last_active: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    /// Sliding expiry: any touched session lives another full TTL.
    pub fn touch(&mut self, ttl: Duration) {
        self.last_active = Utc::now();
        self.expires_at = self.last_active + ttl;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_anonymous_and_live() {
        let session = Session::new("s1".to_string(), Duration::hours(24));

        assert!(!session.is_authenticated());
        assert!(!session.is_expired());
        assert!(session.csrf_token.is_none());
    }

    #[test]
    fn zero_ttl_session_expires() {
        let session = Session::new("s1".to_string(), Duration::zero());
        std::thread::sleep(std::time::Duration::from_millis(5));

        assert!(session.is_expired());
    }

    #[test]
    fn touch_extends_expiry() {
        let mut session = Session::new("s1".to_string(), Duration::zero());
        std::thread::sleep(std::time::Duration::from_millis(5));
        session.touch(Duration::hours(1));

        assert!(!session.is_expired());
        assert!(session.last_active >= session.created_at);
    }
}
