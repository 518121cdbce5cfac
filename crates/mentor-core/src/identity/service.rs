//! Account operations on top of an [`IdentityStore`].

use super::model::{UserRecord, UserRecordPatch, UserRecordUpdate};
use super::password::{hash_password, validate_password, validate_username, verify_password};
use super::store::IdentityStore;
use crate::error::Result;
use std::sync::Arc;

/// Result of checking a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    Granted,
    WrongPassword,
    UnknownUser,
}

/// Hashes credentials and enforces account rules before touching the store.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn IdentityStore>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Returns whether `username` is registered.
    ///
    /// A store failure is reported as `false`.
    pub async fn exists(&self, username: &str) -> bool {
        match self.store.fetch(username).await {
            Ok(record) => record.is_some(),
            Err(e) => {
                tracing::warn!("[Identity] Lookup of '{}' failed: {}", username, e);
                false
            }
        }
    }

    /// Registers a new account.
    ///
    /// The password must already satisfy the policy; it is checked again here
    /// so nothing weaker is ever hashed into the store.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        phone_number: &str,
        email: &str,
    ) -> Result<()> {
        validate_username(username)?;
        validate_password(password)?;

        let record = UserRecord {
            username: username.to_string(),
            hashed_password: hash_password(password)?,
            phone_number: phone_number.to_string(),
            email: email.to_string(),
        };

        self.store.create_if_absent(&record).await?;
        tracing::info!("[Identity] Registered '{}'", username);
        Ok(())
    }

    /// Looks up the account without interpreting missing or failing reads.
    pub async fn find(&self, username: &str) -> Result<Option<UserRecord>> {
        self.store.fetch(username).await
    }

    /// Checks a login attempt.
    ///
    /// A store failure reads as [`Authentication::UnknownUser`].
    pub async fn authenticate(&self, username: &str, password: &str) -> Authentication {
        match self.store.fetch(username).await {
            Ok(Some(record)) if verify_password(password, &record.hashed_password) => {
                Authentication::Granted
            }
            Ok(Some(_)) => Authentication::WrongPassword,
            Ok(None) => Authentication::UnknownUser,
            Err(e) => {
                tracing::warn!("[Identity] Verification of '{}' failed: {}", username, e);
                Authentication::UnknownUser
            }
        }
    }

    /// Returns `true` only if `username` exists and `password` matches its
    /// stored hash.
    pub async fn verify(&self, username: &str, password: &str) -> bool {
        self.authenticate(username, password).await == Authentication::Granted
    }

    /// Applies a partial update, re-hashing a new password first.
    pub async fn update(&self, username: &str, patch: UserRecordPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let hashed_password = match &patch.password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let update = UserRecordUpdate {
            hashed_password,
            phone_number: patch.phone_number,
            email: patch.email,
        };

        self.store.update(username, &update).await?;
        tracing::info!("[Identity] Updated '{}'", username);
        Ok(())
    }

    pub async fn delete(&self, username: &str) -> Result<()> {
        self.store.delete(username).await?;
        tracing::info!("[Identity] Deleted '{}'", username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MentorError;
    use crate::identity::InMemoryIdentityStore;
    use async_trait::async_trait;

    /// Store whose every call fails, as if the backend were unreachable.
    struct UnreachableStore;

    #[async_trait]
    impl IdentityStore for UnreachableStore {
        async fn fetch(&self, _username: &str) -> Result<Option<UserRecord>> {
            Err(MentorError::store_unavailable("connection refused"))
        }

        async fn create_if_absent(&self, _record: &UserRecord) -> Result<()> {
            Err(MentorError::store_write("connection refused"))
        }

        async fn update(&self, _username: &str, _update: &UserRecordUpdate) -> Result<()> {
            Err(MentorError::store_write("connection refused"))
        }

        async fn delete(&self, _username: &str) -> Result<()> {
            Err(MentorError::store_write("connection refused"))
        }
    }

    fn service() -> (IdentityService, Arc<InMemoryIdentityStore>) {
        let store = Arc::new(InMemoryIdentityStore::new());
        (IdentityService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_create_then_verify() {
        let (service, store) = service();
        service
            .create("alice", "Abc123!@", "5550100", "alice@example.com")
            .await
            .unwrap();

        assert!(service.exists("alice").await);
        assert!(service.verify("alice", "Abc123!@").await);
        assert!(!service.verify("alice", "Abc123!#").await);

        let record = store.fetch("alice").await.unwrap().unwrap();
        assert_ne!(record.hashed_password, "Abc123!@");
        assert_eq!(record.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate() {
        let (service, _) = service();
        service.create("alice", "Abc123!@", "", "").await.unwrap();

        let err = service.create("alice", "Xyz789!@", "", "").await.unwrap_err();
        assert!(err.is_duplicate_user());
        assert!(service.verify("alice", "Abc123!@").await);
    }

    #[tokio::test]
    async fn test_create_rejects_weak_password_before_store() {
        let (service, store) = service();
        let err = service.create("bob", "abc12345", "", "").await.unwrap_err();

        assert!(err.is_validation());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_authenticate_distinguishes_outcomes() {
        let (service, _) = service();
        service.create("frank", "Abc123!@", "", "").await.unwrap();

        assert_eq!(service.authenticate("frank", "Abc123!@").await, Authentication::Granted);
        assert_eq!(service.authenticate("frank", "wrong").await, Authentication::WrongPassword);
        assert_eq!(service.authenticate("nobody", "Abc123!@").await, Authentication::UnknownUser);
    }

    #[tokio::test]
    async fn test_verify_unknown_user_is_false() {
        let (service, _) = service();
        assert!(!service.exists("ghost").await);
        assert!(!service.verify("ghost", "Abc123!@").await);
    }

    #[tokio::test]
    async fn test_verify_fails_after_password_replaced() {
        let (service, _) = service();
        service.create("carol", "Abc123!@", "", "").await.unwrap();

        service
            .update(
                "carol",
                UserRecordPatch {
                    password: Some("New456$%".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!service.verify("carol", "Abc123!@").await);
        assert!(service.verify("carol", "New456$%").await);
    }

    #[tokio::test]
    async fn test_update_contact_details_keeps_password() {
        let (service, store) = service();
        service.create("dave", "Abc123!@", "1", "old@example.com").await.unwrap();

        service
            .update(
                "dave",
                UserRecordPatch {
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let record = store.fetch("dave").await.unwrap().unwrap();
        assert_eq!(record.email, "new@example.com");
        assert_eq!(record.phone_number, "1");
        assert!(service.verify("dave", "Abc123!@").await);
    }

    #[tokio::test]
    async fn test_delete_removes_account() {
        let (service, _) = service();
        service.create("erin", "Abc123!@", "", "").await.unwrap();
        service.delete("erin").await.unwrap();
        assert!(!service.exists("erin").await);
    }

    #[tokio::test]
    async fn test_store_failures() {
        let service = IdentityService::new(Arc::new(UnreachableStore));

        assert!(!service.exists("alice").await);
        assert!(!service.verify("alice", "Abc123!@").await);

        let err = service.create("alice", "Abc123!@", "", "").await.unwrap_err();
        assert!(matches!(err, MentorError::StoreWrite(_)));

        let err = service.delete("alice").await.unwrap_err();
        assert!(err.is_store());
    }
}
