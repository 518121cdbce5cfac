//! In-memory identity store.

use super::model::{UserRecord, UserRecordUpdate};
use super::store::IdentityStore;
use crate::error::{MentorError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local identity store used by offline runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn fetch(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_if_absent(&self, record: &UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.username) {
            return Err(MentorError::duplicate_user(&record.username));
        }
        users.insert(record.username.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, username: &str, update: &UserRecordUpdate) -> Result<()> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(username)
            .ok_or_else(|| MentorError::store_write(format!("no user '{}' to update", username)))?;
        update.apply_to(record);
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<()> {
        self.users.write().await.remove(username);
        Ok(())
    }
}
