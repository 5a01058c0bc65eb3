//! Per-agent artifact rendering and parsing: pure functions, no I/O.
//!
//! An artifact is a fenced `key: value` header, two ownership comment lines,
//! a closing fence, a blank line, and the raw prompt body:
//!
//! ```text
//! ---
//! name: Writer
//! description: "Drafts: long-form text"
//! model: sonnet
//! # workflow: demo
//! # injected: 2026-03-01T12:30:00Z
//! ---
//!
//! <prompt body, verbatim>
//! ```

#![allow(clippy::format_push_string)]

use std::borrow::Cow;

use btw_common::AgentDefinition;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::ownership::{self, HEADER_FENCE};
use crate::domain::target::TargetProfile;

/// Why an artifact failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactParseError {
    #[error("artifact does not start with a '---' header")]
    MissingHeader,
    #[error("artifact header is not closed by '---'")]
    UnterminatedHeader,
    #[error("malformed header line: {0}")]
    MalformedLine(String),
    #[error("invalid quoted value: {0}")]
    BadQuoting(String),
}

/// A parsed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArtifact {
    /// Header fields in file order, values unquoted.
    pub fields: Vec<(String, String)>,
    pub workflow_id: Option<String>,
    pub injected_at: Option<String>,
    pub body: String,
}

impl ParsedArtifact {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Render the artifact for one agent.
///
/// Deterministic for a given `injected_at`.
#[must_use]
pub fn render(
    profile: &TargetProfile,
    agent: &AgentDefinition,
    workflow_id: &str,
    injected_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str(HEADER_FENCE);
    out.push('\n');
    out.push_str(&format!("name: {}\n", quote_value(&agent.name)));
    out.push_str(&format!("description: {}\n", quote_value(&agent.description)));
    if let Some(model) = agent.model.as_deref() {
        out.push_str(&format!("model: {}\n", quote_value(profile.map_model(model))));
    }
    for (key, value) in profile.extra_header {
        out.push_str(&format!("{key}: {value}\n"));
    }
    for line in ownership::artifact_marker_lines(workflow_id, injected_at) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(HEADER_FENCE);
    out.push_str("\n\n");
    out.push_str(&agent.system_prompt);
    out
}

/// Returns `true` if `value` must be quoted to survive a header round trip.
#[must_use]
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains([':', '#', '\n', '\r', '\t'])
        || value.starts_with([
            '"', '\'', '[', ']', '{', '}', '>', '|', '*', '&', '!', '%', '@', '`', ',', '-', '?',
        ])
}

/// Quote a header value when needed, escaping backslashes, quotes and
/// line breaks so the value stays on one line.
#[must_use]
pub fn quote_value(value: &str) -> Cow<'_, str> {
    if !needs_quoting(value) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// Reverse `quote_value`. Unquoted input is returned as is.
///
/// # Errors
///
/// Returns an error for an unterminated quote or an unknown escape.
pub fn unquote_value(raw: &str) -> Result<String, ArtifactParseError> {
    let Some(inner) = raw.strip_prefix('"') else {
        return Ok(raw.to_string());
    };
    let inner = inner
        .strip_suffix('"')
        .ok_or_else(|| ArtifactParseError::BadQuoting(raw.to_string()))?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '"' {
            return Err(ArtifactParseError::BadQuoting(raw.to_string()));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            _ => return Err(ArtifactParseError::BadQuoting(raw.to_string())),
        }
    }
    Ok(out)
}

/// Parse an artifact produced by [`render`].
///
/// # Errors
///
/// Returns an error if the header fence is missing or a header line is
/// malformed.
pub fn parse(content: &str) -> Result<ParsedArtifact, ArtifactParseError> {
    let rest = content
        .strip_prefix(HEADER_FENCE)
        .and_then(|r| r.strip_prefix('\n'))
        .ok_or(ArtifactParseError::MissingHeader)?;
    let (header, after) = if let Some(r) = rest.strip_prefix("---\n") {
        ("", r)
    } else {
        let close = rest
            .find("\n---\n")
            .ok_or(ArtifactParseError::UnterminatedHeader)?;
        (&rest[..close], &rest[close + 5..])
    };

    let mut parsed = ParsedArtifact {
        fields: Vec::new(),
        workflow_id: None,
        injected_at: None,
        body: after.strip_prefix('\n').unwrap_or(after).to_string(),
    };

    for line in header.lines() {
        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();
            if let Some(id) = comment.strip_prefix("workflow:") {
                parsed.workflow_id = Some(id.trim().to_string());
            } else if let Some(ts) = comment.strip_prefix("injected:") {
                parsed.injected_at = Some(ts.trim().to_string());
            }
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| ArtifactParseError::MalformedLine(line.to_string()))?;
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(ArtifactParseError::MalformedLine(line.to_string()));
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        parsed.fields.push((key.to_string(), unquote_value(value)?));
    }
    Ok(parsed)
}
