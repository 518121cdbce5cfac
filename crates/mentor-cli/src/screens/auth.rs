use anyhow::Result;
use colored::Colorize;

use mentor_application::{AppContext, AuthStatus, Route, RouteRequest, SignupForm};

use super::{Input, Repl, confirm, go, header, read_line, read_secret, status_line};

/// Reads a field, mapping Ctrl-C back to `back` and Ctrl-D to quit.
macro_rules! field {
    ($input:expr, $back:expr) => {
        match $input {
            Input::Line(value) => value,
            Input::Cancelled => return Ok($back),
            Input::Quit => return Ok(None),
        }
    };
}

pub async fn login(context: &AppContext, rl: &mut Repl) -> Result<Option<RouteRequest>> {
    header("Login");
    println!("{}", "Leave the username empty to create an account.".bright_black());

    let username = field!(read_line(rl, "Username: ")?, go(Route::Login));
    if username.is_empty() {
        return Ok(go(Route::Signup));
    }
    let password = field!(read_secret(rl, "Password: ")?, go(Route::Login));
    let Some(remember_me) = confirm(rl, "Remember me? [y/N] ")? else {
        return Ok(go(Route::Login));
    };

    let status = context.auth().login(&username, &password, remember_me).await;
    Ok(finish(status, Route::Login))
}

pub async fn signup(context: &AppContext, rl: &mut Repl) -> Result<Option<RouteRequest>> {
    header("Sign up");
    println!("{}", "Press Ctrl-C to go back to login.".bright_black());

    let back = go(Route::Login);
    let form = SignupForm {
        username: field!(read_line(rl, "Username: ")?, back),
        password: field!(read_secret(rl, "Password: ")?, back),
        confirm_password: field!(read_secret(rl, "Confirm password: ")?, back),
        phone_number: field!(read_line(rl, "Phone number: ")?, back),
        email: field!(read_line(rl, "Email: ")?, back),
        remember_me: match confirm(rl, "Remember me? [y/N] ")? {
            Some(remember) => remember,
            None => return Ok(back),
        },
    };

    let status = context.auth().signup(&form).await;
    Ok(finish(status, Route::Signup))
}

fn finish(status: AuthStatus, retry: Route) -> Option<RouteRequest> {
    status_line(&status.message(), status.is_success());
    go(status.next_route().unwrap_or(retry))
}
