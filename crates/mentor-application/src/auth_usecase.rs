//! Signup, login and the remembered username.

use crate::navigation::Route;
use mentor_core::error::MentorError;
use mentor_core::identity::password::{validate_confirmation, validate_password, validate_username};
use mentor_core::identity::{Authentication, IdentityService};
use mentor_core::preference::{PreferenceStore, USER_PREFS_NAMESPACE, USERNAME_KEY};
use std::sync::Arc;

pub const SIGNUP_SUCCESS_MESSAGE: &str = "User registered successfully";
pub const USERNAME_TAKEN_MESSAGE: &str = "Username already exists. Please choose another one.";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";
pub const INCORRECT_PASSWORD_MESSAGE: &str = "Incorrect password";
pub const UNKNOWN_USER_MESSAGE: &str = "User does not exist";

/// Everything the signup screen collects.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    pub email: String,
    pub remember_me: bool,
}

/// Per-field validation messages, shown under each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirmation: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.confirmation.is_none()
    }

    fn messages(&self) -> Vec<&str> {
        [&self.username, &self.password, &self.confirmation]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect()
    }
}

/// Outcome of a signup or login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Registered,
    UsernameTaken,
    RegistrationFailed(String),
    Invalid(FormErrors),
    LoggedIn,
    IncorrectPassword,
    UnknownUser,
}

impl AuthStatus {
    /// Status line shown under the form.
    pub fn message(&self) -> String {
        match self {
            AuthStatus::Registered => SIGNUP_SUCCESS_MESSAGE.to_string(),
            AuthStatus::UsernameTaken => USERNAME_TAKEN_MESSAGE.to_string(),
            AuthStatus::RegistrationFailed(reason) => {
                format!("User registration failed: {}", reason)
            }
            AuthStatus::Invalid(errors) => errors.messages().join("\n"),
            AuthStatus::LoggedIn => LOGIN_SUCCESS_MESSAGE.to_string(),
            AuthStatus::IncorrectPassword => INCORRECT_PASSWORD_MESSAGE.to_string(),
            AuthStatus::UnknownUser => UNKNOWN_USER_MESSAGE.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthStatus::Registered | AuthStatus::LoggedIn)
    }

    /// Screen to show next; `None` stays on the form.
    pub fn next_route(&self) -> Option<Route> {
        self.is_success().then_some(Route::Dashboard)
    }
}

/// Account flows of the login and signup screens.
#[derive(Clone)]
pub struct AuthUseCase {
    preferences: Arc<dyn PreferenceStore>,
    identity: IdentityService,
}

impl AuthUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStore>, identity: IdentityService) -> Self {
        Self {
            preferences,
            identity,
        }
    }

    /// Registers an account from the signup form.
    ///
    /// A taken username is reported before password problems. The
    /// existence check is advisory; the conditional create decides.
    pub async fn signup(&self, form: &SignupForm) -> AuthStatus {
        if let Err(e) = validate_username(&form.username) {
            return AuthStatus::Invalid(FormErrors {
                username: Some(e.to_string()),
                ..Default::default()
            });
        }

        if self.identity.exists(&form.username).await {
            return AuthStatus::UsernameTaken;
        }

        let errors = FormErrors {
            username: None,
            password: validate_password(&form.password).err().map(|e| e.to_string()),
            confirmation: validate_confirmation(&form.password, &form.confirm_password)
                .err()
                .map(|e| e.to_string()),
        };
        if !errors.is_empty() {
            return AuthStatus::Invalid(errors);
        }

        match self
            .identity
            .create(&form.username, &form.password, &form.phone_number, &form.email)
            .await
        {
            Ok(()) => {
                if form.remember_me {
                    self.remember(&form.username);
                }
                AuthStatus::Registered
            }
            Err(MentorError::DuplicateUser(_)) => AuthStatus::UsernameTaken,
            Err(e) => {
                tracing::warn!("[Auth] Signup for '{}' failed: {}", form.username, e);
                AuthStatus::RegistrationFailed(e.to_string())
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str, remember_me: bool) -> AuthStatus {
        match self.identity.authenticate(username, password).await {
            Authentication::Granted => {
                if remember_me {
                    self.remember(username);
                }
                tracing::info!("[Auth] '{}' logged in", username);
                AuthStatus::LoggedIn
            }
            Authentication::WrongPassword => AuthStatus::IncorrectPassword,
            Authentication::UnknownUser => AuthStatus::UnknownUser,
        }
    }

    pub fn remembered_user(&self) -> Option<String> {
        self.preferences
            .get(USER_PREFS_NAMESPACE, USERNAME_KEY)
            .filter(|name| !name.is_empty())
    }

    /// First screen on launch: the dashboard for a remembered user.
    pub fn launch_route(&self) -> Route {
        if self.remembered_user().is_some() {
            Route::Dashboard
        } else {
            Route::Login
        }
    }

    pub fn logout(&self) {
        self.preferences.remove(USER_PREFS_NAMESPACE, USERNAME_KEY);
        tracing::info!("[Auth] Forgot remembered user");
    }

    fn remember(&self, username: &str) {
        self.preferences
            .put(USER_PREFS_NAMESPACE, USERNAME_KEY, username.to_string());
    }
}
