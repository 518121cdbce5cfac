//! Gemini generator against a mock `generateContent` endpoint.

use mentor_core::config::GenerationSettings;
use mentor_core::generation::TextGenerator;
use mentor_infrastructure::SecretServiceImpl;
use mentor_interaction::GeminiTextGenerator;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

#[tokio::test]
async fn test_generate_sends_prompt_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "What is 2 + 2?" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("4")))
        .expect(1)
        .mount(&server)
        .await;

    let generator = GeminiTextGenerator::new("test-key").with_base_url(server.uri());
    assert_eq!(generator.generate("What is 2 + 2?").await.unwrap(), "4");
}

#[tokio::test]
async fn test_http_failure_is_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let generator = GeminiTextGenerator::new("bad-key").with_base_url(server.uri());
    let err = generator.generate("hello").await.unwrap_err();

    assert!(err.is_generation());
    assert!(err.to_string().contains("API key not valid"));
    assert!(!err.to_string().contains("bad-key"));
}

#[tokio::test]
async fn test_malformed_body_is_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let generator = GeminiTextGenerator::new("k").with_base_url(server.uri());
    assert!(generator.generate("hello").await.unwrap_err().is_generation());
}

#[tokio::test]
async fn test_from_secrets_uses_file_key_and_model() {
    // The environment overrides the file.
    if std::env::var("GEMINI_API_KEY").is_ok() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let secret_path = temp_dir.path().join("secret.json");
    std::fs::write(
        &secret_path,
        r#"{"gemini":{"api_key":"file-key","model_name":"gemini-1.5-pro"}}"#,
    )
    .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "file-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let settings = GenerationSettings {
        model: "gemini-1.5-flash".to_string(),
        base_url: server.uri(),
    };
    let secrets = SecretServiceImpl::new(secret_path);
    let generator = GeminiTextGenerator::from_secrets(&secrets, &settings)
        .await
        .unwrap();

    assert_eq!(generator.model(), "gemini-1.5-pro");
    assert_eq!(generator.generate("ping").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_from_secrets_without_key_is_config_error() {
    if std::env::var("GEMINI_API_KEY").is_ok() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let secret_path = temp_dir.path().join("secret.json");
    std::fs::write(&secret_path, r#"{"gemini":{"api_key":""}}"#).unwrap();

    let secrets = SecretServiceImpl::new(secret_path);
    let err = GeminiTextGenerator::from_secrets(&secrets, &GenerationSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, mentor_core::MentorError::Config(_)));
}
