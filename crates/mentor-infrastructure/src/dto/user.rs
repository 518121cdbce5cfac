//! Wire shape of an account under `users/<username>` in the realtime database.

use mentor_core::identity::{UserRecord, UserRecordUpdate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// PHC hash string.
    pub password: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
}

impl UserDto {
    pub fn into_record(self, username: &str) -> UserRecord {
        UserRecord {
            username: username.to_string(),
            hashed_password: self.password,
            phone_number: self.phone_number,
            email: self.email,
        }
    }
}

impl From<&UserRecord> for UserDto {
    fn from(record: &UserRecord) -> Self {
        Self {
            password: record.hashed_password.clone(),
            phone_number: record.phone_number.clone(),
            email: record.email.clone(),
        }
    }
}

/// PATCH body; absent fields are left untouched by the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatchDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&UserRecordUpdate> for UserPatchDto {
    fn from(update: &UserRecordUpdate) -> Self {
        Self {
            password: update.hashed_password.clone(),
            phone_number: update.phone_number.clone(),
            email: update.email.clone(),
        }
    }
}
