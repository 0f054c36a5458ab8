//! User accounts

use crate::auth::models::User;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory user store keyed by user id
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a new account. Fails if the email is already registered.
    pub async fn insert(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(Error::EmailTaken(user.email));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub async fn mark_email_verified(&self, id: &str) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;
        user.email_verified = true;
        Ok(())
    }

    pub async fn set_password_hash(&self, id: &str, password_hash: String) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;
        user.password_hash = password_hash;
        Ok(())
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for UserStore {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(email: &str) -> User {
        User::new("alice".to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = UserStore::new();
        let user = test_user("alice@example.com");
        let id = user.id.clone();
        store.insert(user).await.expect("insert succeeds");

        assert!(store.find_by_id(&id).await.is_some());
        assert!(store.find_by_email("alice@example.com").await.is_some());
        assert!(store.find_by_email("bob@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = UserStore::new();
        store
            .insert(test_user("alice@example.com"))
            .await
            .expect("first insert succeeds");

        let result = store.insert(test_user("alice@example.com")).await;
        assert!(matches!(result, Err(Error::EmailTaken(_))));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_mark_email_verified() {
        let store = UserStore::new();
        let user = test_user("alice@example.com");
        let id = user.id.clone();
        store.insert(user).await.unwrap();

        store.mark_email_verified(&id).await.expect("user exists");
        assert!(store.find_by_id(&id).await.unwrap().email_verified);

        let missing = store.mark_email_verified("nope").await;
        assert!(matches!(missing, Err(Error::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_set_password_hash() {
        let store = UserStore::new();
        let user = test_user("alice@example.com");
        let id = user.id.clone();
        store.insert(user).await.unwrap();

        store
            .set_password_hash(&id, "new-hash".to_string())
            .await
            .expect("user exists");
        assert_eq!(store.find_by_id(&id).await.unwrap().password_hash, "new-hash");
    }
}
