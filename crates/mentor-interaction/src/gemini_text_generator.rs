//! GeminiTextGenerator - Gemini `generateContent` REST client.
//!
//! Each call sends the prompt as a single user part with no conversation
//! context. The API key comes from secret.json or `GEMINI_API_KEY`.

use async_trait::async_trait;
use mentor_core::config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GenerationSettings};
use mentor_core::error::{MentorError, Result};
use mentor_core::generation::TextGenerator;
use mentor_core::secret::SecretService;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Text generator that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiTextGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTextGenerator")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiTextGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Builds a generator from loaded secrets and `[generation]` settings.
    ///
    /// A model named in secret.json wins over config.toml.
    pub async fn from_secrets(
        secrets: &dyn SecretService,
        settings: &GenerationSettings,
    ) -> Result<Self> {
        let secret_config = secrets.load_secrets().await?;
        let gemini = secret_config
            .gemini
            .filter(|gemini| !gemini.api_key.trim().is_empty())
            .ok_or_else(|| {
                MentorError::config(
                    "Gemini API key not found; set gemini.api_key in secret.json or GEMINI_API_KEY",
                )
            })?;

        let model = gemini
            .model_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| settings.model.clone());

        Ok(Self::new(gemini.api_key)
            .with_model(model)
            .with_base_url(settings.base_url.clone()))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the API root, e.g. to point at a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()
            .await
            .map_err(|err| {
                // reqwest errors can embed the URL, which carries the key.
                MentorError::generation(format!(
                    "Gemini API request failed: {}",
                    err.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            MentorError::generation(format!(
                "Failed to parse Gemini response: {}",
                err.without_url()
            ))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(
            "[Gemini] Sending prompt ({} chars) to {}",
            prompt.chars().count(),
            self.model
        );
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// First text part of the last candidate; blank text counts as no reply.
fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| MentorError::generation("Gemini API returned no text in the response candidates"))
}

fn map_http_error(status: StatusCode, body: String) -> MentorError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    MentorError::generation(format!("HTTP {}: {}", status.as_u16(), message))
}
