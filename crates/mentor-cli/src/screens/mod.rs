//! One function per screen. Each returns the route to show next, or `None`
//! to quit.

mod auth;
mod chat;
mod dashboard;
mod exam;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use mentor_application::{AppContext, Route, RouteRequest};

use crate::helper::CliHelper;

pub type Repl = Editor<CliHelper, DefaultHistory>;

/// What a prompt produced.
pub enum Input {
    Line(String),
    /// Ctrl-C: leave the current screen.
    Cancelled,
    /// Ctrl-D or `/quit`.
    Quit,
}

/// Reads one trimmed line. Plain lines go to history.
pub fn read_line(rl: &mut Repl, prompt: &str) -> Result<Input> {
    Ok(match read_message(rl, prompt)? {
        Input::Line(line) => Input::Line(line.trim().to_string()),
        other => other,
    })
}

/// Reads one line exactly as typed, for chat messages. Commands are still
/// recognised with surrounding whitespace.
pub fn read_message(rl: &mut Repl, prompt: &str) -> Result<Input> {
    match rl.readline(prompt) {
        Ok(line) => {
            let trimmed = line.trim();
            if trimmed == "/quit" {
                return Ok(Input::Quit);
            }
            if !trimmed.is_empty() {
                let _ = rl.add_history_entry(line.as_str());
            }
            Ok(Input::Line(line))
        }
        Err(ReadlineError::Interrupted) => Ok(Input::Cancelled),
        Err(ReadlineError::Eof) => Ok(Input::Quit),
        Err(err) => Err(err.into()),
    }
}

/// Reads a line with the input masked. Never added to history.
pub fn read_secret(rl: &mut Repl, prompt: &str) -> Result<Input> {
    if let Some(helper) = rl.helper_mut() {
        helper.set_masking(true);
    }
    let result = rl.readline(prompt);
    if let Some(helper) = rl.helper_mut() {
        helper.set_masking(false);
    }

    match result {
        Ok(line) => Ok(Input::Line(line)),
        Err(ReadlineError::Interrupted) => Ok(Input::Cancelled),
        Err(ReadlineError::Eof) => Ok(Input::Quit),
        Err(err) => Err(err.into()),
    }
}

/// Asks a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(rl: &mut Repl, prompt: &str) -> Result<Option<bool>> {
    Ok(match read_line(rl, prompt)? {
        Input::Line(answer) => Some(matches!(answer.to_lowercase().as_str(), "y" | "yes")),
        Input::Cancelled | Input::Quit => None,
    })
}

pub fn header(title: &str) {
    println!();
    println!("{}", format!("=== {} ===", title).bright_magenta().bold());
}

pub fn status_line(message: &str, success: bool) {
    for line in message.lines() {
        if success {
            println!("{}", line.bright_green());
        } else {
            println!("{}", line.red());
        }
    }
}

/// Runs screens until one asks to quit.
pub async fn run(context: &AppContext, rl: &mut Repl, start: RouteRequest) -> Result<()> {
    let mut current = Some(start);

    while let Some(request) = current {
        tracing::debug!("[Cli] Showing {}", request.route);
        current = match request.route {
            Route::Login => auth::login(context, rl).await?,
            Route::Signup => auth::signup(context, rl).await?,
            Route::Dashboard => dashboard::show(context, rl)?,
            Route::InputTaskNames => dashboard::add_subject(rl)?,
            Route::TutorChat | Route::CounsellorChat => chat::show(context, rl, request.route).await?,
            Route::ExamGeneration => exam::show(context, rl, &request).await?,
        };
    }

    Ok(())
}

/// A route without parameters.
pub fn go(route: Route) -> Option<RouteRequest> {
    Some(RouteRequest {
        route,
        params: Vec::new(),
    })
}
