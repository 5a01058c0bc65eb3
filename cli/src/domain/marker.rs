//! Marker region merger: locate, replace, append, or strip the btw-owned
//! region inside an otherwise user-owned document.
//!
//! Pure functions over document text. The region is everything from the
//! start sentinel through the end sentinel inclusive; bytes outside that
//! span are never rewritten.

use chrono::{DateTime, Utc};

use crate::domain::ownership;

pub const START_SENTINEL: &str = "<!-- BTW:START -->";
pub const END_SENTINEL: &str = "<!-- BTW:END -->";

/// How `merge` treats a document that has no well-formed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Append after the existing content, leaving it verbatim.
    Merge,
    /// Append as well, unless a dangling start sentinel shows earlier btw
    /// output, in which case everything from that sentinel onwards is replaced.
    #[default]
    Replace,
}

impl MergeMode {
    #[must_use]
    pub fn from_flag(merge: bool) -> Self {
        if merge { Self::Merge } else { Self::Replace }
    }
}

/// Byte span of a well-formed region: `start` is the first byte of the start
/// sentinel, `end` is one past the last byte of the end sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpan {
    pub start: usize,
    pub end: usize,
}

/// Frame `payload` between the sentinels, opening with the ownership marker.
#[must_use]
pub fn generate(workflow_id: &str, injected_at: DateTime<Utc>, payload: &str) -> String {
    format!(
        "{START_SENTINEL}\n{}\n{}\n{END_SENTINEL}",
        ownership::region_marker_line(workflow_id, injected_at),
        payload.trim_end_matches('\n')
    )
}

/// Find the owned region.
///
/// The region closes at the first end sentinel that has a start sentinel
/// somewhere before it, and opens at the nearest such start. Sentinels outside
/// that pair stay user bytes. Returns `None` when no end sentinel follows any
/// start sentinel.
#[must_use]
pub fn locate(document: &str) -> Option<RegionSpan> {
    document.match_indices(END_SENTINEL).find_map(|(end, _)| {
        document[..end].rfind(START_SENTINEL).map(|start| RegionSpan {
            start,
            end: end + END_SENTINEL.len(),
        })
    })
}

/// The text of the owned region, sentinels included.
#[must_use]
pub fn region(document: &str) -> Option<&str> {
    locate(document).map(|span| &document[span.start..span.end])
}

/// Returns `true` if the document carries any btw start sentinel, well-formed
/// or not.
#[must_use]
pub fn has_btw_content(document: &str) -> bool {
    document.contains(START_SENTINEL)
}

/// Combine an existing document (or its absence) with a freshly generated
/// region.
#[must_use]
pub fn merge(existing: Option<&str>, new_region: &str, mode: MergeMode) -> String {
    let Some(document) = existing else {
        return format!("{new_region}\n");
    };
    if let Some(span) = locate(document) {
        return format!(
            "{}{new_region}{}",
            &document[..span.start],
            &document[span.end..]
        );
    }
    match (mode, document.find(START_SENTINEL)) {
        (MergeMode::Replace, Some(dangling)) if !document[dangling..].contains(END_SENTINEL) => {
            format!("{}{new_region}\n", &document[..dangling])
        }
        _ => append(document, new_region),
    }
}

fn append(document: &str, new_region: &str) -> String {
    if document.trim().is_empty() {
        return format!("{new_region}\n");
    }
    let separator = if document.ends_with('\n') { "\n" } else { "\n\n" };
    format!("{document}{separator}{new_region}\n")
}

/// Remove a well-formed region together with the blank-line separator that
/// `merge` puts before it and the newline after it.
///
/// Returns `None` when no well-formed region exists, leaving the decision to
/// keep the document untouched with the caller. A returned string that is
/// blank means the document held nothing but the region.
#[must_use]
pub fn strip(document: &str) -> Option<String> {
    let span = locate(document)?;
    let before = &document[..span.start];
    let before = if before.ends_with("\n\n") {
        &before[..before.len() - 1]
    } else {
        before
    };
    let after = &document[span.end..];
    let after = after.strip_prefix('\n').unwrap_or(after);
    Some(format!("{before}{after}"))
}
