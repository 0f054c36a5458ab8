//! Session issuance, resolution and revocation
//!
//! Sessions are server-tracked: the store holds a record keyed by a
//! random 128-bit id, and the client carries `<id>.<hmac-sha256 tag>`
//! in a cookie. Revocation is a single idempotent delete, so it takes
//! effect immediately. The tag lets a tampered credential be told apart
//! from a plain unknown one without extending any trust to the client.

use crate::config::SessionConfig;
use crate::error::Error;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngExt;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::timeout;

type HmacSha256 = Hmac<Sha256>;

/// Bound on a store round trip before resolution degrades to no-session
const STORE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// Server-side session record
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session id, distinct from the user id
    pub id: String,
    /// The identity this credential resolves to
    pub user_id: String,
    /// When the session was issued
    pub issued_at: DateTime<Utc>,
    /// When the session stops resolving
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: String, ttl: Duration) -> Self {
        let now = Utc::now();
        let id_bytes: [u8; 16] = rand::rng().random();
        Self {
            id: hex::encode(id_bytes),
            user_id,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Result of resolving a request credential.
///
/// Absence of a session is the normal state for anonymous traffic,
/// never an error. Expired and tampered credentials resolve to
/// `NoSession` as well.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Authenticated(Session),
    NoSession,
}

impl SessionOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionOutcome::Authenticated(_))
    }
}

/// Issues, resolves and revokes session credentials
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    key: Vec<u8>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a manager from config. An empty secret gets a random
    /// per-process key; existing credentials stop verifying across a
    /// restart, which matches the in-memory store anyway.
    pub fn new(config: &SessionConfig) -> Self {
        let key = if config.secret.is_empty() {
            let bytes: [u8; 32] = rand::rng().random();
            bytes.to_vec()
        } else {
            config.secret.as_bytes().to_vec()
        };
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            key,
            ttl: Duration::hours(config.ttl_hours),
        }
    }

    /// Issue a credential for the given identity.
    ///
    /// Returns the cookie value the client must present on subsequent
    /// requests: `<session id>.<integrity tag>`.
    pub async fn create_session(&self, user_id: &str) -> String {
        let session = Session::new(user_id.to_string(), self.ttl);
        let credential = format!("{}.{}", session.id, self.sign(&session.id));
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
        credential
    }

    /// Resolve a credential to its session.
    ///
    /// Verifies the integrity tag before touching the store, then looks
    /// the record up with a bounded wait. Tag failure, unknown id,
    /// expiry and store timeout all resolve to `NoSession`.
    pub async fn get_session(&self, credential: &str) -> SessionOutcome {
        let Some(session_id) = self.verify_credential(credential) else {
            return SessionOutcome::NoSession;
        };

        let mut sessions = match timeout(STORE_TIMEOUT, self.sessions.write()).await {
            Ok(guard) => guard,
            Err(_) => {
                let err = Error::StoreUnavailable("session lookup timed out".to_string());
                tracing::warn!("{err}, treating request as anonymous");
                return SessionOutcome::NoSession;
            }
        };

        match sessions.get(&session_id) {
            Some(session) if session.is_expired() => {
                sessions.remove(&session_id);
                SessionOutcome::NoSession
            }
            Some(session) => SessionOutcome::Authenticated(session.clone()),
            None => SessionOutcome::NoSession,
        }
    }

    /// Revoke the session behind a credential. Idempotent: revoking a
    /// missing, expired or tampered credential succeeds silently.
    pub async fn clear_session(&self, credential: &str) {
        if let Some(session_id) = self.verify_credential(credential) {
            self.sessions.write().await.remove(&session_id);
        }
    }

    /// Drop expired records
    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired());
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn sign(&self, session_id: &str) -> String {
        // key length is unconstrained for HMAC, new_from_slice cannot fail
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(session_id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check the integrity tag and return the session id it covers.
    /// A bad tag is logged distinctly from a malformed credential so
    /// tampering stays visible internally.
    fn verify_credential(&self, credential: &str) -> Option<String> {
        let (session_id, tag) = credential.split_once('.')?;
        let tag_bytes = hex::decode(tag).ok()?;

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(session_id.as_bytes());
        if mac.verify_slice(&tag_bytes).is_err() {
            tracing::warn!("session credential failed integrity check");
            return None;
        }
        Some(session_id.to_string())
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            key: self.key.clone(),
            ttl: self.ttl,
        }
    }
}

/// Set-Cookie value for a freshly issued credential
pub fn set_cookie_header(config: &SessionConfig, credential: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name,
        credential,
        config.ttl_hours * 3600
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value instructing the client to discard the credential
pub fn clear_cookie_header(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}
