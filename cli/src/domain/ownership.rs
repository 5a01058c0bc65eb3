//! Ownership markers: the only persisted record of which workflow wrote
//! which artifact.
//!
//! Pure functions only. Formatting and parsing live side by side so the
//! textual pattern cannot drift between writer and reader.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

/// Header fence opening and closing every generated artifact.
pub const HEADER_FENCE: &str = "---";

static ARTIFACT_OWNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern; cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^#\s*workflow:\s*(\S+)\s*$").expect("valid regex")
});

static REGION_OWNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"<!--\s*workflow:\s*(\S+)\s*\|\s*injected:\s*(\S+)\s*-->").expect("valid regex")
});

/// Render a timestamp the way every marker embeds it (RFC 3339, UTC, seconds).
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The two comment lines placed at the end of an artifact header.
#[must_use]
pub fn artifact_marker_lines(workflow_id: &str, injected_at: DateTime<Utc>) -> [String; 2] {
    [
        format!("# workflow: {workflow_id}"),
        format!("# injected: {}", format_timestamp(injected_at)),
    ]
}

/// Extract the owning workflow id from an artifact.
///
/// Only the fenced header is searched and the scan stops at the first match,
/// so a `# workflow:` heading inside a prompt body never counts. Returns
/// `None` for files that do not open with a header fence.
#[must_use]
pub fn parse_artifact_owner(content: &str) -> Option<&str> {
    let mut lines = content.lines();
    if lines.next()?.trim_end() != HEADER_FENCE {
        return None;
    }
    for line in lines {
        if line.trim_end() == HEADER_FENCE {
            return None;
        }
        if let Some(caps) = ARTIFACT_OWNER_RE.captures(line) {
            return caps.get(1).map(|m| m.as_str());
        }
    }
    None
}

/// The comment line opening a shared-document region.
#[must_use]
pub fn region_marker_line(workflow_id: &str, injected_at: DateTime<Utc>) -> String {
    format!(
        "<!-- workflow: {workflow_id} | injected: {} -->",
        format_timestamp(injected_at)
    )
}

/// Extract the owning workflow id from a shared-document region.
#[must_use]
pub fn parse_region_owner(region: &str) -> Option<&str> {
    REGION_OWNER_RE
        .captures(region)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
