//! Server-side session storage
//!
//! Sessions live in memory, keyed by an opaque UUID that browsers hold in a
//! signed cookie. Timeout decisions belong to the policy engine; this store
//! only keeps and mutates the records.

use crate::auth::models::UserRole;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Per-browser session state
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// The user this session belongs to
    pub user_id: u64,
    /// Role cached at login time. May go stale if the role changes
    /// mid-session; handlers resolve the live role through the policy engine.
    pub role: UserRole,
    /// Set once at login. None only for corrupted/partial records.
    pub login_at: Option<DateTime<Utc>>,
    /// Refreshed on every validated request
    pub last_seen: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a fresh record with both timestamps set to now
    pub fn new(user_id: u64, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            role,
            login_at: Some(now),
            last_seen: Some(now),
        }
    }
}

/// In-memory session store
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a session for a user, returning the new session id
    pub async fn create(&self, user_id: u64, role: UserRole) -> String {
        let id = Uuid::new_v4().to_string();
        self.insert(id.clone(), SessionRecord::new(user_id, role))
            .await;
        id
    }

    /// Insert a prebuilt record under a given id
    pub async fn insert(&self, id: String, record: SessionRecord) {
        self.sessions.write().await.insert(id, record);
    }

    /// Get a copy of a session record
    pub async fn get(&self, id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Remove a session
    pub async fn remove(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }

    /// Update last_seen, sliding the idle window
    pub async fn touch(&self, id: &str, now: DateTime<Utc>) {
        if let Some(record) = self.sessions.write().await.get_mut(id) {
            record.last_seen = Some(now);
        }
    }

    /// Drop every session past either timeout threshold.
    /// Records missing a timestamp skip that check, matching the policy engine.
    pub async fn purge_expired(
        &self,
        idle_timeout: chrono::Duration,
        max_duration: chrono::Duration,
        now: DateTime<Utc>,
    ) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| {
            let over_max = record
                .login_at
                .map(|t| now - t > max_duration)
                .unwrap_or(false);
            let over_idle = record
                .last_seen
                .map(|t| now - t > idle_timeout)
                .unwrap_or(false);
            !over_max && !over_idle
        });
        before - sessions.len()
    }

    /// Number of live sessions
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}
