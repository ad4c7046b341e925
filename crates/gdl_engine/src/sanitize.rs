use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

// CSI sequences (colors, cursor movement) plus the rarer two-byte escapes.
static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b[@-Z\\-_]").expect("static ansi pattern")
});

/// Removes ANSI escape sequences so collaborator messages display cleanly.
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Renders an error as a single display message without terminal escapes.
pub fn user_message(err: &impl Display) -> String {
    strip_ansi(&err.to_string()).trim().to_string()
}
