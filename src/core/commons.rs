// src/core/commons.rs

//! Ready-made escape hooks for tool descriptors.

use std::borrow::Cow;

/// Wraps a value in double quotes, escaping internal quotes.
/// Values without whitespace or quotes are returned untouched.
pub fn wrap_value(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Quotes a value for a POSIX shell. Values `shlex` cannot represent (NUL bytes)
/// are passed through unchanged.
pub fn shell_quote(value: &str) -> String {
    match shlex::try_quote(value) {
        Ok(Cow::Borrowed(quoted)) => quoted.to_string(),
        Ok(Cow::Owned(quoted)) => quoted,
        Err(_) => value.to_string(),
    }
}
