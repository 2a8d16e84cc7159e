//! Session timeout policy tests
//!
//! Expiry is exercised by inserting records with rewound timestamps and
//! calling authenticate with explicit `now` values; nothing here sleeps.

use chrono::{DateTime, Duration, Utc};
use keydesk::auth::{Denial, SessionPolicy, SessionRecord, SessionStore, UserRole};
use keydesk::store::{NewUser, Store};

const IDLE: i64 = 30; // minutes
const MAX: i64 = 8; // hours

fn policy() -> SessionPolicy {
    SessionPolicy::new(Duration::minutes(IDLE), Duration::hours(MAX))
}

async fn store_with_user(active: bool) -> (Store, u64) {
    let store = Store::in_memory();
    let user = store
        .create_user(NewUser {
            username: "alice".to_string(),
            // authenticate never touches the digest
            password_hash: "unused".to_string(),
            role: UserRole::User,
            active,
        })
        .await
        .unwrap();
    (store, user.id)
}

async fn session_at(
    sessions: &SessionStore,
    user_id: u64,
    login_at: Option<DateTime<Utc>>,
    last_seen: Option<DateTime<Utc>>,
) -> String {
    let id = format!("test-{}", uuid::Uuid::new_v4());
    sessions
        .insert(
            id.clone(),
            SessionRecord {
                user_id,
                role: UserRole::User,
                login_at,
                last_seen,
            },
        )
        .await;
    id
}

#[tokio::test]
async fn test_unknown_session_is_unauthenticated() {
    let (store, _) = store_with_user(true).await;
    let sessions = SessionStore::new();

    let result = policy()
        .authenticate(&sessions, &store, "no-such-session", Utc::now())
        .await;
    assert_eq!(result.unwrap_err(), Denial::Unauthenticated);
}

#[tokio::test]
async fn test_max_duration_expiry_regardless_of_activity() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let now = Utc::now();

    // Active one second ago, but logged in over eight hours ago
    let sid = session_at(
        &sessions,
        user_id,
        Some(now - Duration::hours(MAX) - Duration::minutes(1)),
        Some(now - Duration::seconds(1)),
    )
    .await;

    let result = policy().authenticate(&sessions, &store, &sid, now).await;
    assert_eq!(result.unwrap_err(), Denial::ExpiredMaxDuration);
    assert!(sessions.get(&sid).await.is_none(), "session must be purged");
}

#[tokio::test]
async fn test_max_duration_takes_precedence_over_idle() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let now = Utc::now();

    // Both thresholds exceeded
    let sid = session_at(
        &sessions,
        user_id,
        Some(now - Duration::hours(9)),
        Some(now - Duration::minutes(40)),
    )
    .await;

    let result = policy().authenticate(&sessions, &store, &sid, now).await;
    assert_eq!(result.unwrap_err(), Denial::ExpiredMaxDuration);
}

#[tokio::test]
async fn test_idle_expiry() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let now = Utc::now();

    let sid = session_at(
        &sessions,
        user_id,
        Some(now - Duration::hours(1)),
        Some(now - Duration::minutes(IDLE) - Duration::minutes(1)),
    )
    .await;

    let result = policy().authenticate(&sessions, &store, &sid, now).await;
    assert_eq!(result.unwrap_err(), Denial::ExpiredIdle);
    assert!(sessions.get(&sid).await.is_none(), "session must be purged");
}

#[tokio::test]
async fn test_valid_session_slides_idle_window() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let t0 = Utc::now();

    let sid = session_at(&sessions, user_id, Some(t0), Some(t0)).await;

    let now = t0 + Duration::minutes(29);
    let principal = policy()
        .authenticate(&sessions, &store, &sid, now)
        .await
        .expect("session should be valid");
    assert_eq!(principal.username, "alice");

    let record = sessions.get(&sid).await.unwrap();
    assert_eq!(record.last_seen, Some(now));
    assert_eq!(record.login_at, Some(t0));
}

#[tokio::test]
async fn test_authenticate_is_idempotent() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let now = Utc::now();

    let sid = session_at(&sessions, user_id, Some(now), Some(now)).await;

    let first = policy()
        .authenticate(&sessions, &store, &sid, now)
        .await
        .unwrap();
    let second = policy()
        .authenticate(&sessions, &store, &sid, now)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.username, second.username);
    assert_eq!(first.role, second.role);
}

#[tokio::test]
async fn test_sliding_window_scenario() {
    // Login at T0; requests at T0+29min and T0+58min succeed because each
    // one slides the idle window; a 31-minute gap after that expires it.
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let policy = policy();
    let t0 = Utc::now();

    let sid = session_at(&sessions, user_id, Some(t0), Some(t0)).await;

    for minutes in [29, 58] {
        let result = policy
            .authenticate(&sessions, &store, &sid, t0 + Duration::minutes(minutes))
            .await;
        assert!(result.is_ok(), "request at T0+{}min should pass", minutes);
    }

    let result = policy
        .authenticate(
            &sessions,
            &store,
            &sid,
            t0 + Duration::minutes(58) + Duration::minutes(31),
        )
        .await;
    assert_eq!(result.unwrap_err(), Denial::ExpiredIdle);
}

#[tokio::test]
async fn test_max_duration_scenario_with_constant_activity() {
    // Requests every 10 minutes keep the idle window fresh, but the
    // absolute ceiling still ends the session after eight hours.
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let policy = policy();
    let t0 = Utc::now();

    let sid = session_at(&sessions, user_id, Some(t0), Some(t0)).await;

    let mut minutes = 10;
    while minutes <= MAX * 60 {
        let result = policy
            .authenticate(&sessions, &store, &sid, t0 + Duration::minutes(minutes))
            .await;
        assert!(result.is_ok(), "request at T0+{}min should pass", minutes);
        minutes += 10;
    }

    let result = policy
        .authenticate(
            &sessions,
            &store,
            &sid,
            t0 + Duration::hours(MAX) + Duration::minutes(1),
        )
        .await;
    assert_eq!(result.unwrap_err(), Denial::ExpiredMaxDuration);
}

#[tokio::test]
async fn test_missing_timestamps_skip_their_checks() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let policy = policy();
    let now = Utc::now();

    // No login_at: the max-duration check is not applicable
    let sid = session_at(&sessions, user_id, None, Some(now)).await;
    assert!(policy
        .authenticate(&sessions, &store, &sid, now + Duration::hours(100))
        .await
        .is_err_and(|d| d == Denial::ExpiredIdle));

    // No last_seen: the idle check is not applicable
    let sid = session_at(&sessions, user_id, Some(now), None).await;
    assert!(policy
        .authenticate(&sessions, &store, &sid, now + Duration::hours(1))
        .await
        .is_ok());

    // Neither: both checks skipped, session resolves
    let sid = session_at(&sessions, user_id, None, None).await;
    assert!(policy
        .authenticate(&sessions, &store, &sid, now + Duration::hours(100))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_deactivated_user_is_rejected_and_purged() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let now = Utc::now();

    let sid = session_at(&sessions, user_id, Some(now), Some(now)).await;

    // Lock the account mid-session
    store
        .update_user(user_id, "alice".to_string(), UserRole::User, false)
        .await
        .unwrap();

    let result = policy().authenticate(&sessions, &store, &sid, now).await;
    assert_eq!(result.unwrap_err(), Denial::InvalidUser);
    assert!(sessions.get(&sid).await.is_none(), "session must be purged");
}

#[tokio::test]
async fn test_vanished_user_is_rejected() {
    let (store, _) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let now = Utc::now();

    // Session points at a user id the store has never seen
    let sid = session_at(&sessions, 999, Some(now), Some(now)).await;

    let result = policy().authenticate(&sessions, &store, &sid, now).await;
    assert_eq!(result.unwrap_err(), Denial::InvalidUser);
}

#[tokio::test]
async fn test_principal_role_is_read_fresh_from_the_user() {
    let (store, user_id) = store_with_user(true).await;
    let sessions = SessionStore::new();
    let now = Utc::now();

    let sid = session_at(&sessions, user_id, Some(now), Some(now)).await;

    // Promote mid-session; the cached session role stays stale but the
    // resolved principal follows the user record
    store
        .update_user(user_id, "alice".to_string(), UserRole::Admin, true)
        .await
        .unwrap();

    let principal = policy()
        .authenticate(&sessions, &store, &sid, now)
        .await
        .unwrap();
    assert_eq!(principal.role, UserRole::Admin);
    assert_eq!(sessions.get(&sid).await.unwrap().role, UserRole::User);
}
