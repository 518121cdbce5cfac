//! Account records.

use serde::{Deserialize, Serialize};

/// A registered account as held by the identity store.
///
/// `hashed_password` is a PHC string; the plaintext password never leaves
/// [`super::IdentityService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub hashed_password: String,
    pub phone_number: String,
    pub email: String,
}

/// Partial account update requested by a caller.
///
/// `password` is plaintext here and is re-hashed before it reaches a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecordPatch {
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl UserRecordPatch {
    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.phone_number.is_none() && self.email.is_none()
    }
}

/// Store-level form of [`UserRecordPatch`], with the password already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecordUpdate {
    pub hashed_password: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl UserRecordUpdate {
    /// Applies the update to `record` in place.
    pub fn apply_to(&self, record: &mut UserRecord) {
        if let Some(hash) = &self.hashed_password {
            record.hashed_password = hash.clone();
        }
        if let Some(phone) = &self.phone_number {
            record.phone_number = phone.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
    }
}
