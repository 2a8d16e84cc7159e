//! Authentication building-block tests: password hashing, cookie tokens,
//! session storage, login and the role gate

use keydesk::auth::{
    decode_token, hash_password, issue_token, verify_password, Forbidden, Principal,
    SessionPolicy, SessionStore, UserRole,
};
use keydesk::store::{NewUser, Store};

async fn store_with_user(username: &str, password: &str, active: bool) -> Store {
    let store = Store::in_memory();
    store
        .create_user(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: UserRole::User,
            active,
        })
        .await
        .expect("user creation failed");
    store
}

#[test]
fn test_password_roundtrip() {
    let digest = hash_password("hunter2hunter2").unwrap();
    assert!(verify_password("hunter2hunter2", &digest));
    assert!(!verify_password("hunter3hunter3", &digest));
}

#[test]
fn test_password_digest_is_self_describing() {
    // bcrypt digests embed algorithm, cost and salt
    let digest = hash_password("secret").unwrap();
    assert!(digest.starts_with("$2"));
}

#[test]
fn test_malformed_digest_never_errors() {
    assert!(!verify_password("secret", "plaintext-left-by-a-migration"));
    assert!(!verify_password("secret", ""));
    assert!(!verify_password("", ""));
}

#[test]
fn test_token_roundtrip() {
    let token = issue_token("sid-1", "secret", chrono::Duration::hours(8)).unwrap();
    let claims = decode_token(&token, "secret").unwrap();
    assert_eq!(claims.sid, "sid-1");
}

#[test]
fn test_token_tampering_detected() {
    let token = issue_token("sid-1", "secret", chrono::Duration::hours(8)).unwrap();

    // Signed with a different key
    assert!(decode_token(&token, "other").is_err());

    // Payload flipped without re-signing
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[1] = parts[1].chars().rev().collect();
    assert!(decode_token(&parts.join("."), "secret").is_err());
}

#[tokio::test]
async fn test_session_store_create_and_remove() {
    let sessions = SessionStore::new();
    let id = sessions.create(1, UserRole::Admin).await;

    assert!(sessions.get(&id).await.is_some());
    sessions.remove(&id).await;
    assert!(sessions.get(&id).await.is_none());
}

#[tokio::test]
async fn test_session_ids_are_unique() {
    let sessions = SessionStore::new();
    let a = sessions.create(1, UserRole::User).await;
    let b = sessions.create(1, UserRole::User).await;
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_login_success_opens_session() {
    let store = store_with_user("alice", "correct-horse", true).await;
    let sessions = SessionStore::new();
    let policy = SessionPolicy::default();

    let sid = policy
        .login(&sessions, &store, "alice", "correct-horse")
        .await
        .expect("login should succeed");

    let record = sessions.get(&sid).await.expect("session should exist");
    assert_eq!(record.role, UserRole::User);
    assert_eq!(record.login_at, record.last_seen);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let store = store_with_user("alice", "correct-horse", true).await;
    let sessions = SessionStore::new();
    let policy = SessionPolicy::default();

    // Wrong password
    assert!(policy
        .login(&sessions, &store, "alice", "wrong")
        .await
        .is_none());

    // Unknown username
    assert!(policy
        .login(&sessions, &store, "bob", "correct-horse")
        .await
        .is_none());

    // Correct password, locked account
    let locked = store_with_user("carol", "correct-horse", false).await;
    assert!(policy
        .login(&sessions, &locked, "carol", "correct-horse")
        .await
        .is_none());

    // None of them left a session behind
    assert_eq!(sessions.count().await, 0);
}

#[test]
fn test_role_gate() {
    let admin = Principal {
        id: 1,
        username: "root".to_string(),
        role: UserRole::Admin,
    };
    let user = Principal {
        id: 2,
        username: "alice".to_string(),
        role: UserRole::User,
    };

    assert!(admin.require_role(UserRole::Admin).is_ok());
    assert_eq!(user.require_role(UserRole::Admin).err(), Some(Forbidden));
    assert!(user.require_role(UserRole::User).is_ok());
}
