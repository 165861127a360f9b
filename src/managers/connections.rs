use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub opened_at: DateTime<Utc>,
}

/// Tracks open echo-channel connections by a monotonically increasing id.
/// Entries exist only between channel open and close; there is nothing to
/// persist or expire.
#[derive(Clone)]
pub struct ConnectionRegistry {
    connections: Arc<DashMap<u64, ConnectionInfo>>,
    next_id: Arc<AtomicU64>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn register(&self) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.insert(
            id,
            ConnectionInfo {
                opened_at: Utc::now(),
            },
        );
        id
    }

    pub fn remove(&self, connection_id: u64) -> bool {
        self.connections.remove(&connection_id).is_some()
    }

    pub fn count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_remove_track_count() {
        let registry = ConnectionRegistry::new();

        let a = registry.register();
        let b = registry.register();
        assert_ne!(a, b);
        assert_eq!(registry.count(), 2);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert_eq!(registry.count(), 1);
    }
}
