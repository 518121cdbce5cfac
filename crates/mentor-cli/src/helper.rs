use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Slash commands understood by the chat screens.
pub const CHAT_COMMANDS: [&str; 4] = ["/back", "/clear", "/retry", "/quit"];

/// Rustyline helper: slash-command completion and hints, and masking for
/// password prompts.
pub struct CliHelper {
    commands: Vec<String>,
    masking: bool,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: CHAT_COMMANDS.iter().map(|c| c.to_string()).collect(),
            masking: false,
        }
    }

    /// While set, typed characters are echoed as `*`.
    pub fn set_masking(&mut self, masking: bool) {
        self.masking = masking;
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if self.masking || !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if self.masking || !line.starts_with('/') || line.contains(' ') {
            return None;
        }

        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masking_hides_input() {
        let mut helper = CliHelper::new();
        assert_eq!(helper.highlight("secret", 6), "secret");

        helper.set_masking(true);
        assert_eq!(helper.highlight("secret", 6), "******");
    }
}
