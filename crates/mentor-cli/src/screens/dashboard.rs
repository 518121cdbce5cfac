use anyhow::Result;
use colored::Colorize;

use mentor_application::dashboard::DrawerItem;
use mentor_application::countries::{COUNTRIES, find_country};
use mentor_application::{AppContext, Route, RouteRequest, SubjectDraft, parse_route};

use super::{Input, Repl, go, header, read_line};

pub fn show(context: &AppContext, rl: &mut Repl) -> Result<Option<RouteRequest>> {
    let view = context.dashboard();
    header("Dashboard");
    println!("{}", view.greeting().bright_green().bold());

    match view.empty_message() {
        Some(message) => println!("{}", message.bright_black()),
        None => {
            for subject in &view.subjects {
                println!("  {} ({})", subject.name, subject.completion_status);
            }
        }
    }

    println!();
    for (index, item) in view.drawer().iter().enumerate() {
        println!("  {} {}", format!("{}.", index + 1).cyan(), item.label());
    }
    println!(
        "{}",
        "Pick a number, '+' to add a subject, or type a route name.".bright_black()
    );

    loop {
        let choice = match read_line(rl, ">> ")? {
            Input::Line(choice) => choice,
            Input::Cancelled => continue,
            Input::Quit => return Ok(None),
        };

        if choice.is_empty() {
            continue;
        }
        if choice == "+" {
            return Ok(go(Route::InputTaskNames));
        }

        if let Some(item) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| view.drawer().get(i))
        {
            if *item == DrawerItem::Logout {
                context.auth().logout();
            }
            return Ok(go(item.route()));
        }

        match parse_route(&choice) {
            Ok(request) => return Ok(Some(request)),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }
}

/// The "Add New Subject" dialog. Subjects are not stored, so the draft is
/// read and dropped.
pub fn add_subject(rl: &mut Repl) -> Result<Option<RouteRequest>> {
    header("Add New Subject");
    println!("{}", "Press Ctrl-C to cancel.".bright_black());

    macro_rules! field {
        ($value:expr) => {
            match $value {
                Input::Line(value) => value,
                Input::Cancelled => return Ok(go(Route::Dashboard)),
                Input::Quit => return Ok(None),
            }
        };
    }

    let draft = SubjectDraft {
        subject_name: field!(read_line(rl, "Subject Name: ")?),
        country: field!(read_country(rl)?),
        topic_name: field!(read_line(rl, "Topic Name: ")?),
        class_name: field!(read_line(rl, "Class: ")?),
    };

    if !draft.is_blank() {
        tracing::debug!("[Cli] Subject dialog submitted without saving");
        println!("{}", "Subjects can't be saved yet.".bright_black());
    }
    Ok(go(Route::Dashboard))
}

/// Asks until the input names a listed country or is left empty.
fn read_country(rl: &mut Repl) -> Result<Input> {
    loop {
        let input = match read_line(rl, "Country Name: ")? {
            Input::Line(input) => input,
            other => return Ok(other),
        };
        if input.is_empty() {
            return Ok(Input::Line(input));
        }
        match find_country(&input) {
            Some(country) => {
                println!("{}", country.cyan());
                return Ok(Input::Line(country.to_string()));
            }
            None => {
                let prefix = input.to_lowercase();
                let suggestions: Vec<_> = COUNTRIES
                    .iter()
                    .copied()
                    .filter(|c| c.to_lowercase().starts_with(&prefix))
                    .take(8)
                    .collect();
                if suggestions.is_empty() {
                    println!("{}", "No such country in the list.".yellow());
                } else {
                    println!("{}", format!("Did you mean: {}?", suggestions.join(", ")).yellow());
                }
            }
        }
    }
}
