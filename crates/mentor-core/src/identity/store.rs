//! Identity store abstraction.

use super::model::{UserRecord, UserRecordUpdate};
use crate::error::Result;
use async_trait::async_trait;

/// Remote keyed record store holding accounts by username.
///
/// Read failures surface as `StoreUnavailable`, write failures as
/// `StoreWrite`.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns the record stored under `username`, if any.
    async fn fetch(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Writes `record` only if no record exists under its username.
    ///
    /// Must be a single conditional write so concurrent signups for the same
    /// name cannot both succeed. Fails with `DuplicateUser` when taken.
    async fn create_if_absent(&self, record: &UserRecord) -> Result<()>;

    /// Merges `update` into the existing record.
    async fn update(&self, username: &str, update: &UserRecordUpdate) -> Result<()>;

    async fn delete(&self, username: &str) -> Result<()>;
}
