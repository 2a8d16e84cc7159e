//! Session validity and access-control policy
//!
//! Every protected request funnels through [`SessionPolicy::authenticate`],
//! which either resolves a [`Principal`] or says why not. All denials look
//! the same from the browser (cleared session, redirect to the login page);
//! the variants exist for diagnostics.

use crate::auth::models::Principal;
use crate::auth::password::verify_password;
use crate::auth::session::SessionStore;
use crate::store::Store;
use chrono::{DateTime, Utc};

/// Why a session was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No session, or the cookie resolved to no stored record
    Unauthenticated,
    /// Session older than the absolute ceiling
    ExpiredMaxDuration,
    /// Gap since the last validated request exceeded the idle timeout
    ExpiredIdle,
    /// The referenced user is gone or deactivated
    InvalidUser,
}

/// Timeout rules applied to every session
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    idle_timeout: chrono::Duration,
    max_duration: chrono::Duration,
}

impl SessionPolicy {
    pub fn new(idle_timeout: chrono::Duration, max_duration: chrono::Duration) -> Self {
        Self {
            idle_timeout,
            max_duration,
        }
    }

    pub fn from_config(config: &crate::config::SessionConfig) -> Self {
        Self::new(config.idle_timeout(), config.max_duration())
    }

    pub fn idle_timeout(&self) -> chrono::Duration {
        self.idle_timeout
    }

    pub fn max_duration(&self) -> chrono::Duration {
        self.max_duration
    }

    /// Validate the session behind `session_id` and resolve its user.
    ///
    /// The max-duration check runs before the idle check and wins when both
    /// thresholds are exceeded. A record missing a timestamp skips that
    /// specific check. Passing both checks slides the idle window before the
    /// user lookup, so a since-deactivated user's idle clock is extended on
    /// the very request that rejects them; that ordering matches the
    /// long-observed behavior of this system and stays.
    pub async fn authenticate(
        &self,
        sessions: &SessionStore,
        store: &Store,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, Denial> {
        let Some(record) = sessions.get(session_id).await else {
            return Err(Denial::Unauthenticated);
        };

        if let Some(login_at) = record.login_at {
            if now - login_at > self.max_duration {
                sessions.remove(session_id).await;
                return Err(Denial::ExpiredMaxDuration);
            }
        }

        if let Some(last_seen) = record.last_seen {
            if now - last_seen > self.idle_timeout {
                sessions.remove(session_id).await;
                return Err(Denial::ExpiredIdle);
            }
        }

        sessions.touch(session_id, now).await;

        let Some(user) = store.user_by_id(record.user_id).await else {
            sessions.remove(session_id).await;
            return Err(Denial::InvalidUser);
        };
        if !user.active {
            sessions.remove(session_id).await;
            return Err(Denial::InvalidUser);
        }

        Ok(Principal {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }

    /// Check credentials and open a session.
    ///
    /// Returns None uniformly for an unknown username, a wrong password and a
    /// deactivated account, so the login page cannot be used to enumerate
    /// which of the three it was.
    pub async fn login(
        &self,
        sessions: &SessionStore,
        store: &Store,
        username: &str,
        password: &str,
    ) -> Option<String> {
        let user = store.user_by_username(username).await?;
        if !verify_password(password, &user.password_hash) {
            return None;
        }
        if !user.active {
            return None;
        }
        Some(sessions.create(user.id, user.role).await)
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new(chrono::Duration::minutes(30), chrono::Duration::hours(8))
    }
}
