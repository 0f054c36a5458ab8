//! Storefront categories
//!
//! The minimal catalog entity needed by the admin-only management
//! routes. The wider catalog lives outside this subsystem.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Category {
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            created_at: chrono::Utc::now(),
        }
    }
}

/// In-memory category store
pub struct CategoryStore {
    categories: Arc<RwLock<HashMap<String, Category>>>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, category: Category) {
        self.categories
            .write()
            .await
            .insert(category.id.clone(), category);
    }

    pub async fn list(&self) -> Vec<Category> {
        let mut all: Vec<Category> = self.categories.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.categories
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CategoryStore {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_list_delete() {
        let store = CategoryStore::new();
        let shoes = Category::new("Shoes".to_string());
        let id = shoes.id.clone();
        store.insert(shoes).await;
        store.insert(Category::new("Bags".to_string())).await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        // sorted by name
        assert_eq!(listed[0].name, "Bags");

        store.delete(&id).await.expect("category exists");
        assert_eq!(store.list().await.len(), 1);
        assert!(store.delete(&id).await.is_err());
    }
}
