//! Rustyline helper: completion and hints for the chat prompt
//!
//! Completes slash commands, and the level argument of /depth. Plain
//! research questions get history hints instead.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;

use super::colors::ansi::{DIM, RESET};

/// Slash commands for tab completion
pub const SLASH_COMMANDS: &[&str] = &[
    "/help",
    "/version",
    "/uptime",
    "/depth",
    "/backend",
    "/history",
    "/clear",
    "/status",
    "/quit",
    "/exit",
];

/// Levels accepted by /depth
const DEPTH_LEVELS: &[&str] = &["auto", "quick", "medium", "deep"];

/// Custom helper for rustyline with completion and hints
pub struct BriefHelper {
    hinter: HistoryHinter,
}

impl BriefHelper {
    pub fn new() -> Self {
        Self {
            hinter: HistoryHinter::new(),
        }
    }
}

impl Default for BriefHelper {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidates for the text under the cursor, with the position the
/// replacement starts at
fn complete_line(line: &str, pos: usize) -> (usize, Vec<Pair>) {
    if !line.starts_with('/') {
        return (pos, vec![]);
    }

    let command = line.split_whitespace().next().unwrap_or("");

    // Command word itself
    if pos <= command.len() {
        let matches = candidates(SLASH_COMMANDS, command);
        return (0, matches);
    }

    // Level argument of /depth
    if command == "/depth" {
        let arg_start = line[..pos].rfind(' ').map(|i| i + 1).unwrap_or(pos);
        let matches = candidates(DEPTH_LEVELS, line[arg_start..pos].trim());
        return (arg_start, matches);
    }

    (pos, vec![])
}

fn candidates(options: &[&str], prefix: &str) -> Vec<Pair> {
    options
        .iter()
        .filter(|opt| opt.starts_with(prefix))
        .map(|opt| Pair {
            display: opt.to_string(),
            replacement: opt.to_string(),
        })
        .collect()
}

impl Completer for BriefHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(complete_line(line, pos))
    }
}

impl Hinter for BriefHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        // Research questions recur across sessions; commands do not
        if !line.starts_with('/') {
            self.hinter.hint(line, pos, ctx)
        } else {
            None
        }
    }
}

impl Highlighter for BriefHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("{}{}{}", DIM, hint, RESET))
    }
}

impl Validator for BriefHelper {}

impl Helper for BriefHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(line: &str, pos: usize) -> (usize, Vec<String>) {
        let (start, pairs) = complete_line(line, pos);
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn test_complete_command_prefix() {
        let (start, matches) = replacements("/de", 3);
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["/depth"]);
    }

    #[test]
    fn test_complete_depth_levels() {
        let (start, matches) = replacements("/depth q", 8);
        assert_eq!(start, 7);
        assert_eq!(matches, vec!["quick"]);

        let (_, matches) = replacements("/depth ", 7);
        assert_eq!(matches, vec!["auto", "quick", "medium", "deep"]);
    }

    #[test]
    fn test_no_completion_for_plain_input() {
        let (_, matches) = replacements("research rust adoption", 10);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_no_argument_completion_for_other_commands() {
        let (_, matches) = replacements("/backend http", 13);
        assert!(matches.is_empty());
    }
}
