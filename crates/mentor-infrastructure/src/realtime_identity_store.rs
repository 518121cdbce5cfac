//! Identity store backed by the Firebase Realtime Database REST API.
//!
//! Accounts live at `<database_url>/users/<username>.json`. Signup uses the
//! database's ETag protocol: read the absent node with `X-Firebase-ETag`, then
//! write with `if-match`, so a concurrent signup for the same name makes the
//! second writer fail with `412 Precondition Failed`.

use crate::dto::{UserDto, UserPatchDto};
use async_trait::async_trait;
use mentor_core::error::{MentorError, Result};
use mentor_core::identity::{IdentityStore, UserRecord, UserRecordUpdate};
use reqwest::header::{ETAG, IF_MATCH};
use reqwest::{Client, RequestBuilder, Response, StatusCode};

const FIREBASE_ETAG_HEADER: &str = "X-Firebase-ETag";

#[derive(Clone)]
pub struct RealtimeIdentityStore {
    client: Client,
    database_url: String,
    auth_token: Option<String>,
}

impl RealtimeIdentityStore {
    pub fn new(database_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            database_url: database_url.into().trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    fn user_url(&self, username: &str) -> String {
        format!(
            "{}/users/{}.json",
            self.database_url,
            urlencoding::encode(username)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token)]),
            None => request,
        }
    }

    async fn read_node(&self, username: &str, with_etag: bool) -> Result<(Option<UserDto>, Option<String>)> {
        let mut request = self.authorize(self.client.get(self.user_url(username)));
        if with_etag {
            request = request.header(FIREBASE_ETAG_HEADER, "true");
        }

        let response = request
            .send()
            .await
            .map_err(|e| MentorError::store_unavailable(format!("Identity store request failed: {e}")))?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(MentorError::store_unavailable(message));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| MentorError::store_unavailable(format!("Failed to read identity store response: {e}")))?;

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok((None, etag));
        }

        let dto = serde_json::from_str::<UserDto>(trimmed).map_err(|e| {
            MentorError::store_unavailable(format!("Malformed record for '{username}': {e}"))
        })?;
        Ok((Some(dto), etag))
    }

    async fn send_write(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| MentorError::store_write(format!("Identity store request failed: {e}")))?;
        Ok(response)
    }
}

#[async_trait]
impl IdentityStore for RealtimeIdentityStore {
    async fn fetch(&self, username: &str) -> Result<Option<UserRecord>> {
        let (dto, _) = self.read_node(username, false).await?;
        Ok(dto.map(|dto| dto.into_record(username)))
    }

    async fn create_if_absent(&self, record: &UserRecord) -> Result<()> {
        let (existing, etag) = self.read_node(&record.username, true).await?;
        if existing.is_some() {
            return Err(MentorError::duplicate_user(&record.username));
        }
        let etag = etag.ok_or_else(|| {
            MentorError::store_write("Identity store did not return an ETag for conditional create")
        })?;

        let request = self
            .authorize(self.client.put(self.user_url(&record.username)))
            .header(IF_MATCH, etag)
            .json(&UserDto::from(record));
        let response = self.send_write(request).await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::PRECONDITION_FAILED => {
                tracing::info!("[Identity] Lost signup race for '{}'", record.username);
                Err(MentorError::duplicate_user(&record.username))
            }
            _ => Err(MentorError::store_write(error_message(response).await)),
        }
    }

    async fn update(&self, username: &str, update: &UserRecordUpdate) -> Result<()> {
        let request = self
            .authorize(self.client.patch(self.user_url(username)))
            .json(&UserPatchDto::from(update));
        let response = self.send_write(request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(MentorError::store_write(error_message(response).await))
        }
    }

    async fn delete(&self, username: &str) -> Result<()> {
        let request = self.authorize(self.client.delete(self.user_url(username)));
        let response = self.send_write(request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(MentorError::store_write(error_message(response).await))
        }
    }
}

/// Builds an error message from a failed response.
///
/// The database reports errors as `{"error": "..."}`.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(body);

    if detail.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {}", status.as_u16(), detail.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_url_encodes_username() {
        let store = RealtimeIdentityStore::new("https://mentor.firebaseio.com/", None);
        assert_eq!(
            store.user_url("ana maria"),
            "https://mentor.firebaseio.com/users/ana%20maria.json"
        );
    }
}
