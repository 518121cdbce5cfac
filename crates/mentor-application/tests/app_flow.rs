use mentor_application::{AuthStatus, Bootstrap, Route, SignupForm};
use mentor_core::chat::{ChatMessage, ChatSurface, SessionStatus};
use tempfile::TempDir;

fn signup_form(username: &str) -> SignupForm {
    SignupForm {
        username: username.to_string(),
        password: "Abc123!@".to_string(),
        confirm_password: "Abc123!@".to_string(),
        phone_number: "5550100".to_string(),
        email: format!("{}@example.com", username),
        remember_me: true,
    }
}

#[tokio::test]
async fn test_offline_first_run_creates_files() {
    let temp_dir = TempDir::new().unwrap();
    let bootstrap = Bootstrap::load(Some(temp_dir.path())).unwrap();
    let context = bootstrap.build_context(true).await.unwrap();

    assert!(temp_dir.path().join("config.toml").exists());
    assert!(temp_dir.path().join("secret.json").exists());
    assert_eq!(context.auth().launch_route(), Route::Login);
}

#[tokio::test]
async fn test_signup_persists_remembered_user_across_restarts() {
    let temp_dir = TempDir::new().unwrap();
    let bootstrap = Bootstrap::load(Some(temp_dir.path())).unwrap();

    let context = bootstrap.build_context(true).await.unwrap();
    let status = context.auth().signup(&signup_form("alice")).await;
    assert_eq!(status, AuthStatus::Registered);
    assert_eq!(context.dashboard().greeting(), "Welcome back, alice!");
    context.shutdown().await;
    drop(context);

    let reopened = bootstrap.build_context(true).await.unwrap();
    assert_eq!(reopened.auth().launch_route(), Route::Dashboard);
    assert_eq!(reopened.dashboard().username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_chat_without_api_key_fails_and_keeps_history() {
    if std::env::var("GEMINI_API_KEY").is_ok() {
        eprintln!("GEMINI_API_KEY is set, skipping");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let bootstrap = Bootstrap::load(Some(temp_dir.path())).unwrap();
    let context = bootstrap.build_context(true).await.unwrap();

    let chat = context.open_chat(ChatSurface::Tutor);
    chat.submit("What is a prime number?");
    let snapshot = chat.settled().await;

    assert!(matches!(snapshot.status, SessionStatus::Failed { .. }));
    assert_eq!(
        snapshot.messages,
        vec![ChatMessage::user("What is a prime number?")]
    );
    context.shutdown().await;
    drop(chat);

    let restored = context.open_chat(ChatSurface::Tutor);
    assert_eq!(restored.messages().len(), 1);
    assert!(context.open_chat(ChatSurface::Counsellor).messages().is_empty());
}
