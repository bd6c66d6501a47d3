//! Sanitizing of upstream error messages.
//!
//! Messages from the resolver stack or WHOIS may contain filesystem paths,
//! source line numbers or control characters. Everything returned to callers
//! goes through [`sanitize_error_message`] first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

static UNIX_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[^\s]+/[^\s]+").expect("path pattern is valid")
});

static WINDOWS_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"C:\\[^\s]+").expect("path pattern is valid")
});

static LINE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"line \d+").expect("line pattern is valid")
});

/// Strips control characters, file paths and line numbers, then caps the
/// length at `MAX_ERROR_MESSAGE_LENGTH` characters plus a `...` marker.
pub fn sanitize_error_message(message: &str) -> String {
    let cleaned: String = message
        .chars()
        .filter(|c| {
            // Keep tab/newline/CR, drop other C0 controls
            let code = *c as u32;
            code >= 0x20 || code == 0x09 || code == 0x0A || code == 0x0D
        })
        .collect();

    let cleaned = UNIX_PATH.replace_all(&cleaned, "[PATH]");
    let cleaned = WINDOWS_PATH.replace_all(&cleaned, "[PATH]");
    let cleaned = LINE_NUMBER.replace_all(&cleaned, "line [N]");

    if cleaned.chars().count() > MAX_ERROR_MESSAGE_LENGTH {
        let truncated: String = cleaned.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        cleaned.into_owned()
    }
}
