//! Named screens and route strings.
//!
//! A route string is a screen name optionally followed by parameters:
//! `ExamGenerationScreen?subject=Physics&exam=Finals`.

use mentor_core::chat::ChatSurface;
use mentor_core::error::{MentorError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    /// The dashboard.
    Dashboard,
    /// The "Add New Subject" dialog.
    InputTaskNames,
    TutorChat,
    CounsellorChat,
    ExamGeneration,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Signup,
        Route::Dashboard,
        Route::InputTaskNames,
        Route::TutorChat,
        Route::CounsellorChat,
        Route::ExamGeneration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Signup => "signup",
            Route::Dashboard => "new_screen",
            Route::InputTaskNames => "input_task_names",
            Route::TutorChat => "ChatScreen",
            Route::CounsellorChat => "ChatScreen1",
            Route::ExamGeneration => "ExamGenerationScreen",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.name() == name)
    }

    /// The chat surface this screen shows, if it is a chat screen.
    pub fn chat_surface(&self) -> Option<ChatSurface> {
        match self {
            Route::TutorChat => Some(ChatSurface::Tutor),
            Route::CounsellorChat => Some(ChatSurface::Counsellor),
            _ => None,
        }
    }

    pub fn for_surface(surface: ChatSurface) -> Self {
        match surface {
            ChatSurface::Tutor => Route::TutorChat,
            ChatSurface::Counsellor => Route::CounsellorChat,
        }
    }

    /// Renders this route with parameters.
    pub fn with_params(&self, params: &[(&str, &str)]) -> String {
        build_route(self.name(), params)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Route {
    type Err = MentorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| MentorError::not_found("route", s))
    }
}

/// Joins `screen` and `params` into a route string.
///
/// Keys and values are percent-encoded so `&`, `=` and `?` survive parsing.
pub fn build_route(screen: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return screen.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", screen, query)
}

/// A parsed route string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub route: Route,
    pub params: Vec<(String, String)>,
}

impl RouteRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses a route string produced by [`build_route`].
///
/// Unknown screen names are `NotFound`; a parameter without `=` has an empty
/// value.
pub fn parse_route(input: &str) -> Result<RouteRequest> {
    let (screen, query) = match input.split_once('?') {
        Some((screen, query)) => (screen, Some(query)),
        None => (input, None),
    };

    let route = screen.parse::<Route>()?;
    let mut params = Vec::new();

    for pair in query.into_iter().flat_map(|q| q.split('&')).filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.push((decode(key)?, decode(value)?));
    }

    Ok(RouteRequest { route, params })
}

fn decode(component: &str) -> Result<String> {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| MentorError::validation(format!("Invalid route parameter '{}': {}", component, e)))
}
