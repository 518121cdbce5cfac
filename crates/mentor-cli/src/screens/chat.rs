use anyhow::Result;
use colored::Colorize;

use mentor_application::{AppContext, Route, RouteRequest};
use mentor_core::chat::{ChatMessage, ChatSession, REPLY_FAILED_NOTICE, SessionStatus};

use super::{Input, Repl, go, header, read_message};

pub async fn show(context: &AppContext, rl: &mut Repl, route: Route) -> Result<Option<RouteRequest>> {
    let Some(surface) = route.chat_surface() else {
        return Ok(go(Route::Dashboard));
    };

    let session = context.open_chat(surface);
    header(surface.title());
    println!(
        "{}",
        "Type a message, or /clear, /retry, /back, /quit.".bright_black()
    );

    let mut shown = print_from(&session.messages(), 0);

    loop {
        let line = match read_message(rl, ">> ")? {
            Input::Line(line) => line,
            Input::Cancelled => return Ok(go(Route::Dashboard)),
            Input::Quit => return Ok(None),
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Blank => continue,
            ChatCommand::Back => return Ok(go(Route::Dashboard)),
            ChatCommand::Clear => {
                session.clear();
                shown = 0;
                println!("{}", "Chat cleared.".bright_black());
                continue;
            }
            ChatCommand::Retry => {
                if !session.retry() {
                    println!("{}", "Nothing to retry.".bright_black());
                    continue;
                }
            }
            ChatCommand::Send(text) => {
                session.submit(text);
                // The user line was already echoed by the editor.
                shown = session.messages().len();
            }
        }

        shown = wait_for_reply(&session, shown).await;
    }
}

/// One line typed on a chat screen.
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Blank,
    Back,
    Clear,
    Retry,
    /// A message, sent exactly as typed.
    Send(&'a str),
}

impl<'a> ChatCommand<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => ChatCommand::Blank,
            "/back" => ChatCommand::Back,
            "/clear" => ChatCommand::Clear,
            "/retry" => ChatCommand::Retry,
            _ => ChatCommand::Send(line),
        }
    }
}

async fn wait_for_reply(session: &ChatSession, shown: usize) -> usize {
    println!("{}", "Thinking...".bright_black());
    let snapshot = session.settled().await;
    let shown = print_from(&snapshot.messages, shown);

    if let SessionStatus::Failed { error, .. } = &snapshot.status {
        println!("{}", REPLY_FAILED_NOTICE.red());
        println!("{}", error.bright_black());
        println!("{}", "Type /retry to try again.".yellow());
    }
    shown
}

/// Prints `messages[from..]` and returns the new count.
fn print_from(messages: &[ChatMessage], from: usize) -> usize {
    for message in messages.iter().skip(from) {
        if message.is_user_message {
            println!("{}", format!("> {}", message.text).green());
        } else {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
    }
    messages.len()
}
