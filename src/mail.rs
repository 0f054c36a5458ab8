//! Outbound mail boundary
//!
//! Delivery itself is an external collaborator; this records what would
//! be sent so flows can hand a raw token secret off without it ever
//! entering a log or a store. The in-memory outbox doubles as the test
//! observation point.

use std::sync::Arc;
use tokio::sync::RwLock;

/// One outbound message
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub link: String,
}

/// Collects outbound messages for the delivery boundary
pub struct Mailer {
    base_url: String,
    outbox: Arc<RwLock<Vec<MailMessage>>>,
}

impl Mailer {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            outbox: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue an email-verification link carrying the raw secret
    pub async fn send_verification_link(&self, to: &str, secret: &str) {
        let message = MailMessage {
            to: to.to_string(),
            subject: "Verify your Shopfront email".to_string(),
            link: format!("{}/verify-email?token={}", self.base_url, secret),
        };
        tracing::info!(to = %message.to, "queued verification email");
        self.outbox.write().await.push(message);
    }

    /// Queue a password-reset link carrying the raw secret
    pub async fn send_password_reset_link(&self, to: &str, secret: &str) {
        let message = MailMessage {
            to: to.to_string(),
            subject: "Reset your Shopfront password".to_string(),
            link: format!("{}/reset-password?token={}", self.base_url, secret),
        };
        tracing::info!(to = %message.to, "queued password reset email");
        self.outbox.write().await.push(message);
    }

    /// Messages queued so far, oldest first
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.outbox.read().await.clone()
    }
}

impl Clone for Mailer {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            outbox: Arc::clone(&self.outbox),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verification_link_carries_secret() {
        let mailer = Mailer::new("http://localhost:4680".to_string());
        mailer
            .send_verification_link("alice@example.com", "s3cret")
            .await;

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert!(sent[0].link.ends_with("/verify-email?token=s3cret"));
    }
}
