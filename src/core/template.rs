// src/core/template.rs

//! Format templates such as `--param {key}={value}`.

use crate::constants::{KEY_PLACEHOLDER, VALUE_PLACEHOLDER};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{([^{}\s]*)\}").expect("placeholder regex is valid");
}

/// Maximum number of whitespace-delimited segments in a format.
const MAX_SEGMENTS: usize = 3;

/// Malformed argument formats.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder other than `{value}` or `{key}`.
    #[error("Unknown placeholder '{{{placeholder}}}' in format '{format}'.")]
    UnknownPlaceholder { format: String, placeholder: String },
    /// `{key}` in a non-map format.
    #[error("Placeholder '{{key}}' is only valid for map properties (format '{0}').")]
    KeyOutsideMap(String),
    /// A collection format without `{value}`.
    #[error("Format '{0}' has no '{{value}}' placeholder.")]
    MissingValue(String),
}

/// A format such as `--param {key}={value}`, split into at most three segments.
/// The third segment keeps any inner whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate<'a> {
    format: &'a str,
    segments: Vec<&'a str>,
}

fn is_placeholder_segment(segment: &str) -> bool {
    segment.contains(VALUE_PLACEHOLDER) || segment.contains(KEY_PLACEHOLDER)
}

impl<'a> FormatTemplate<'a> {
    /// Splits and validates `format`. `allow_key` enables `{key}` (maps and multimaps).
    pub fn parse(format: &'a str, allow_key: bool) -> Result<Self, TemplateError> {
        for caps in PLACEHOLDER_RE.captures_iter(format) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            match name {
                "value" => {}
                "key" if allow_key => {}
                "key" => return Err(TemplateError::KeyOutsideMap(format.to_string())),
                other => {
                    return Err(TemplateError::UnknownPlaceholder {
                        format: format.to_string(),
                        placeholder: other.to_string(),
                    });
                }
            }
        }

        let mut segments = Vec::with_capacity(MAX_SEGMENTS);
        let mut rest = format.trim();
        while !rest.is_empty() {
            if segments.len() == MAX_SEGMENTS - 1 {
                segments.push(rest);
                break;
            }
            match rest.find(char::is_whitespace) {
                Some(index) => {
                    let (head, tail) = rest.split_at(index);
                    segments.push(head);
                    rest = tail.trim_start();
                }
                None => {
                    segments.push(rest);
                    break;
                }
            }
        }

        Ok(Self { format, segments })
    }

    /// The original format text.
    pub fn format(&self) -> &'a str {
        self.format
    }

    /// All segments, in order.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Whether the format contains `{value}`.
    pub fn has_value(&self) -> bool {
        self.format.contains(VALUE_PLACEHOLDER)
    }

    /// Literal segments before the first placeholder segment.
    pub fn prefix(&self) -> &[&'a str] {
        let end = self
            .segments
            .iter()
            .position(|s| is_placeholder_segment(s))
            .unwrap_or(self.segments.len());
        self.segments.get(..end).unwrap_or_default()
    }

    /// The first segment holding a placeholder, used once per rendered item.
    pub fn body(&self) -> Option<&'a str> {
        self.segments.iter().copied().find(|s| is_placeholder_segment(s))
    }

    /// Segments after the body.
    pub fn suffix(&self) -> &[&'a str] {
        match self.segments.iter().position(|s| is_placeholder_segment(s)) {
            Some(index) => self.segments.get(index + 1..).unwrap_or_default(),
            None => &[],
        }
    }

    /// Requires a `{value}` placeholder, returning the body segment.
    pub fn require_body(&self) -> Result<&'a str, TemplateError> {
        match self.body() {
            Some(body) if self.has_value() => Ok(body),
            _ => Err(TemplateError::MissingValue(self.format.to_string())),
        }
    }
}

/// Splits a body segment at its first placeholder: the literal lead (`-p:` in
/// `-p:{key}={value}`) and the part repeated per entry.
pub fn split_body(body: &str) -> (&str, &str) {
    match PLACEHOLDER_RE.find(body) {
        Some(m) => body.split_at(m.start()),
        None => ("", body),
    }
}

/// Substitutes `{value}` in `segment`.
pub fn substitute_value(segment: &str, value: &str) -> String {
    segment.replace(VALUE_PLACEHOLDER, value)
}

/// Substitutes `{key}` and `{value}` in `segment` in a single pass, so a key
/// containing `{value}` is not substituted twice.
pub fn substitute_entry(segment: &str, key: &str, value: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(segment, |caps: &regex::Captures<'_>| {
            match caps.get(1).map_or("", |m| m.as_str()) {
                "key" => key.to_string(),
                "value" => value.to_string(),
                _ => caps.get(0).map_or("", |m| m.as_str()).to_string(),
            }
        })
        .into_owned()
}
