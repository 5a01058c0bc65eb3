//! Shared configuration document region: pure rendering, no I/O.

#![allow(clippy::format_push_string)]

use btw_common::Manifest;
use chrono::{DateTime, Utc};

use crate::domain::marker::{self, END_SENTINEL, START_SENTINEL};
use crate::domain::ownership::format_timestamp;

/// Tool version stamped into every region footer.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the framed region for a manifest: header, optional description,
/// metadata, agent catalog, footer.
#[must_use]
pub fn render(manifest: &Manifest, injected_at: DateTime<Utc>) -> String {
    marker::generate(&manifest.id, injected_at, &payload(manifest, injected_at))
}

fn payload(manifest: &Manifest, injected_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n", inert(&manifest.name)));
    if !manifest.description.trim().is_empty() {
        out.push('\n');
        out.push_str(&inert(manifest.description.trim()));
        out.push('\n');
    }

    out.push_str("\n## Workflow\n\n");
    out.push_str(&format!("- **ID**: `{}`\n", manifest.id));
    out.push_str(&format!("- **Version**: {}\n", inert(&manifest.version)));
    if let Some(author) = &manifest.author {
        out.push_str(&format!("- **Author**: {}\n", inert(author)));
    }
    if let Some(repo) = &manifest.repository {
        out.push_str(&format!("- **Repository**: {}\n", inert(repo)));
    }

    out.push_str("\n## Agents\n\n");
    for agent in &manifest.agents {
        out.push_str(&format!("- **{}** (`{}`)", inert(&agent.name), agent.id));
        let description = agent.description.trim();
        if !description.is_empty() {
            out.push_str(&format!(": {}", inert(&description.replace('\n', " "))));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\n---\n_Generated by btw v{TOOL_VERSION} at {}_\n",
        format_timestamp(injected_at)
    ));
    out
}

/// Manifest text must never contain a sentinel, or the region would stop
/// being well-formed.
fn inert(text: &str) -> String {
    text.replace(START_SENTINEL, "<!-- BTW START -->")
        .replace(END_SENTINEL, "<!-- BTW END -->")
}
