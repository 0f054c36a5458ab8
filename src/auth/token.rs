//! Single-use verification tokens
//!
//! Tokens prove control of an out-of-band channel (email verification,
//! password reset). Only the SHA-256 hash of a secret is ever persisted;
//! the raw secret leaves the process once, inside the delivered link.

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

/// Verification tokens are valid for 24 hours from issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// What a token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

/// A freshly minted token.
///
/// `secret` goes to the user out-of-band; `hash` and `expires_at` are
/// what the caller persists.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub secret: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a single-use secret with 256 bits of entropy.
///
/// Pure computation: persistence of the hash is the caller's job.
pub fn generate_verification_token() -> IssuedToken {
    let bytes: [u8; 32] = rand::rng().random();
    let secret = hex::encode(bytes);
    IssuedToken {
        hash: hash_token(&secret),
        expires_at: Utc::now() + Duration::hours(TOKEN_TTL_HOURS),
        secret,
    }
}

/// Deterministic one-way transform of a secret into its stored form.
pub fn hash_token(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn hashes_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Persisted token record. The raw secret is never stored.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    pub hash: String,
    pub user_id: String,
    pub purpose: TokenPurpose,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub used: bool,
}

impl VerificationToken {
    pub fn new(user_id: String, purpose: TokenPurpose, issued: &IssuedToken) -> Self {
        Self {
            hash: issued.hash.clone(),
            user_id,
            purpose,
            expires_at: issued.expires_at,
            created_at: Utc::now(),
            used: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Outcome of presenting a secret for validation.
///
/// All three failure variants deny the action but produce different
/// user-facing guidance, so callers must be able to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Valid { user_id: String },
    NotFound,
    Expired,
    AlreadyUsed,
}

/// In-memory store for verification token records
pub struct TokenStore {
    tokens: Arc<RwLock<Vec<VerificationToken>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Persist a token record
    pub async fn insert(&self, token: VerificationToken) {
        self.tokens.write().await.push(token);
    }

    /// Validate and consume the token matching the presented secret.
    ///
    /// Lookup is by hash only, so no code path handles the raw secret
    /// beyond this re-hash. A valid token is marked used before the
    /// caller honors the request; an expired one is purged.
    pub async fn consume(&self, secret: &str, purpose: TokenPurpose) -> TokenOutcome {
        let hash = hash_token(secret);
        let mut tokens = self.tokens.write().await;

        let Some(pos) = tokens
            .iter()
            .position(|t| t.purpose == purpose && hashes_match(&t.hash, &hash))
        else {
            return TokenOutcome::NotFound;
        };

        // expired records are reclaimed here whether or not they were
        // consumed first; a consumed record still reports as used
        if tokens[pos].is_expired() {
            let was_used = tokens[pos].used;
            tokens.remove(pos);
            return if was_used {
                TokenOutcome::AlreadyUsed
            } else {
                TokenOutcome::Expired
            };
        }
        if tokens[pos].used {
            return TokenOutcome::AlreadyUsed;
        }

        tokens[pos].used = true;
        TokenOutcome::Valid {
            user_id: tokens[pos].user_id.clone(),
        }
    }

    /// Drop expired records. Nothing schedules this; expiry is always
    /// enforced at validation time regardless.
    pub async fn cleanup_expired(&self) {
        self.tokens.write().await.retain(|t| !t.is_expired());
    }

    pub async fn token_count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TokenStore {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let issued = generate_verification_token();
        assert_eq!(hash_token(&issued.secret), issued.hash);
        assert_eq!(hash_token(&issued.secret), hash_token(&issued.secret));
    }

    #[test]
    fn test_distinct_secrets_distinct_hashes() {
        let a = generate_verification_token();
        let b = generate_verification_token();
        assert_ne!(a.secret, b.secret);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_expiry_is_24_hours_out() {
        let before = Utc::now();
        let issued = generate_verification_token();
        let after = Utc::now();

        let lower = before + Duration::hours(TOKEN_TTL_HOURS);
        let upper = after + Duration::hours(TOKEN_TTL_HOURS) + Duration::seconds(1);
        assert!(issued.expires_at >= lower);
        assert!(issued.expires_at <= upper);
    }

    #[tokio::test]
    async fn test_consume_valid_token() {
        let store = TokenStore::new();
        let issued = generate_verification_token();
        store
            .insert(VerificationToken::new(
                "user-1".to_string(),
                TokenPurpose::EmailVerification,
                &issued,
            ))
            .await;

        let outcome = store
            .consume(&issued.secret, TokenPurpose::EmailVerification)
            .await;
        assert_eq!(
            outcome,
            TokenOutcome::Valid {
                user_id: "user-1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_second_consume_is_rejected() {
        let store = TokenStore::new();
        let issued = generate_verification_token();
        store
            .insert(VerificationToken::new(
                "user-1".to_string(),
                TokenPurpose::PasswordReset,
                &issued,
            ))
            .await;

        store
            .consume(&issued.secret, TokenPurpose::PasswordReset)
            .await;
        let second = store
            .consume(&issued.secret, TokenPurpose::PasswordReset)
            .await;
        assert_eq!(second, TokenOutcome::AlreadyUsed);
    }

    #[tokio::test]
    async fn test_unknown_secret_not_found() {
        let store = TokenStore::new();
        let outcome = store
            .consume("not-a-real-secret", TokenPurpose::EmailVerification)
            .await;
        assert_eq!(outcome, TokenOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_purpose_mismatch_not_found() {
        let store = TokenStore::new();
        let issued = generate_verification_token();
        store
            .insert(VerificationToken::new(
                "user-1".to_string(),
                TokenPurpose::EmailVerification,
                &issued,
            ))
            .await;

        let outcome = store
            .consume(&issued.secret, TokenPurpose::PasswordReset)
            .await;
        assert_eq!(outcome, TokenOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_consumed_token_purged_once_expired() {
        let store = TokenStore::new();
        let issued = generate_verification_token();
        store
            .insert(VerificationToken::new(
                "user-1".to_string(),
                TokenPurpose::EmailVerification,
                &issued,
            ))
            .await;

        store
            .consume(&issued.secret, TokenPurpose::EmailVerification)
            .await;

        // the consumed record outlives its expiry
        {
            let mut tokens = store.tokens.write().await;
            tokens[0].expires_at = Utc::now() - Duration::minutes(1);
        }

        let outcome = store
            .consume(&issued.secret, TokenPurpose::EmailVerification)
            .await;
        assert_eq!(outcome, TokenOutcome::AlreadyUsed);
        assert_eq!(store.token_count().await, 0);
    }

    #[tokio::test]
    async fn test_expired_token_rejected_and_purged() {
        let store = TokenStore::new();
        let issued = generate_verification_token();
        let mut record = VerificationToken::new(
            "user-1".to_string(),
            TokenPurpose::EmailVerification,
            &issued,
        );
        record.expires_at = Utc::now() - Duration::minutes(1);
        store.insert(record).await;

        let outcome = store
            .consume(&issued.secret, TokenPurpose::EmailVerification)
            .await;
        assert_eq!(outcome, TokenOutcome::Expired);
        assert_eq!(store.token_count().await, 0);
    }
}
