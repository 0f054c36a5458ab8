//! Authentication and session tests

use shopfront::auth::{
    session::{clear_cookie_header, set_cookie_header},
    Principal, SessionManager, User,
};
use shopfront::config::SessionConfig;

fn manager() -> SessionManager {
    SessionManager::new(&SessionConfig {
        secret: "test-secret".to_string(),
        ..SessionConfig::default()
    })
}

#[test]
fn test_new_user_defaults() {
    let user = User::new(
        "alice".to_string(),
        "alice@example.com".to_string(),
        "hash".to_string(),
    );
    assert_eq!(user.username, "alice");
    assert!(!user.admin);
    assert!(!user.email_verified);
    assert!(!user.is_admin());
}

#[test]
fn test_principal_exposes_id_and_admin_flag_only() {
    let mut user = User::new(
        "root".to_string(),
        "root@example.com".to_string(),
        "hash".to_string(),
    );
    user.admin = true;

    let principal = Principal::from(&user);
    assert_eq!(principal.user_id, user.id);
    assert!(principal.admin);
}

#[test]
fn test_user_id_uniqueness() {
    let user1 = User::new("a".to_string(), "a@example.com".to_string(), "h".to_string());
    let user2 = User::new("a".to_string(), "a@example.com".to_string(), "h".to_string());
    assert_ne!(user1.id, user2.id);
}

#[tokio::test]
async fn test_session_create_and_resolve() {
    let manager = manager();
    let credential = manager.create_session("user-1").await;

    let outcome = manager.get_session(&credential).await;
    assert!(outcome.is_authenticated());
}

#[tokio::test]
async fn test_credential_is_not_the_user_id() {
    let manager = manager();
    let credential = manager.create_session("user-1").await;
    assert!(!credential.contains("user-1"));
}

#[tokio::test]
async fn test_clear_session_is_idempotent() {
    let manager = manager();
    let credential = manager.create_session("user-1").await;

    manager.clear_session(&credential).await;
    assert!(!manager.get_session(&credential).await.is_authenticated());

    manager.clear_session(&credential).await;
    assert!(!manager.get_session(&credential).await.is_authenticated());
}

#[tokio::test]
async fn test_clear_unknown_credential_succeeds() {
    let manager = manager();
    manager.clear_session("deadbeef.deadbeef").await;
    manager.clear_session("").await;
}

#[tokio::test]
async fn test_tampered_credential_does_not_resolve() {
    let manager = manager();
    let credential = manager.create_session("user-1").await;

    // flip one character of the session id, keeping the tag
    let mut chars: Vec<char> = credential.chars().collect();
    chars[0] = if chars[0] == '0' { '1' } else { '0' };
    let tampered: String = chars.into_iter().collect();

    assert!(!manager.get_session(&tampered).await.is_authenticated());
    assert!(manager.get_session(&credential).await.is_authenticated());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let manager = manager();
    let cred1 = manager.create_session("user-1").await;
    let cred2 = manager.create_session("user-2").await;

    manager.clear_session(&cred1).await;
    assert!(!manager.get_session(&cred1).await.is_authenticated());
    assert!(manager.get_session(&cred2).await.is_authenticated());
}

#[tokio::test]
async fn test_manager_clone_shares_sessions() {
    let manager1 = manager();
    let manager2 = manager1.clone();

    let credential = manager1.create_session("user-1").await;
    assert!(manager2.get_session(&credential).await.is_authenticated());

    manager2.clear_session(&credential).await;
    assert!(!manager1.get_session(&credential).await.is_authenticated());
}

#[test]
fn test_session_cookie_attributes() {
    let config = SessionConfig::default();
    let cookie = set_cookie_header(&config, "abc.def");
    assert!(cookie.starts_with("shopfront_session=abc.def;"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));

    let clear = clear_cookie_header(&config);
    assert!(clear.contains("Max-Age=0"));
}
