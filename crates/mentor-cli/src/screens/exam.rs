use anyhow::Result;
use colored::Colorize;

use mentor_application::{AppContext, Route, RouteRequest};

use super::{Input, Repl, go, header, read_line};

/// Asks for the exam and subject, unless the route already carries them
/// (`ExamGenerationScreen?exam=...&subject=...`).
pub async fn show(
    context: &AppContext,
    rl: &mut Repl,
    request: &RouteRequest,
) -> Result<Option<RouteRequest>> {
    header("Exam practice paper generation");

    let exam_name = match request.param("exam") {
        Some(exam) => exam.to_string(),
        None => match read_line(rl, "Exam name: ")? {
            Input::Line(exam) => exam,
            Input::Cancelled => return Ok(go(Route::Dashboard)),
            Input::Quit => return Ok(None),
        },
    };
    let subject = match request.param("subject") {
        Some(subject) => subject.to_string(),
        None => match read_line(rl, "Subject: ")? {
            Input::Line(subject) => subject,
            Input::Cancelled => return Ok(go(Route::Dashboard)),
            Input::Quit => return Ok(None),
        },
    };

    println!("{}", "Generating...".bright_black());
    match context.exam_papers().generate_paper(&exam_name, &subject).await {
        Ok(paper) => {
            println!();
            for line in paper.lines() {
                println!("{}", line.bright_blue());
            }
        }
        Err(e) => println!("{}", format!("Error: {}", e).red()),
    }

    Ok(go(Route::Dashboard))
}
