// lib/crates/btw-common/src/target.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An external AI coding tool whose configuration layout btw knows how to
/// write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Claude,
    Cursor,
    Windsurf,
    Copilot,
}

impl Target {
    /// Every supported target, in display order.
    pub const ALL: [Target; 4] = [
        Target::Claude,
        Target::Cursor,
        Target::Windsurf,
        Target::Copilot,
    ];

    /// Lowercase identifier used on the command line and in manifests.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Claude => "claude",
            Target::Cursor => "cursor",
            Target::Windsurf => "windsurf",
            Target::Copilot => "copilot",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported target '{0}' (expected one of: claude, cursor, windsurf, copilot)")]
pub struct ParseTargetError(pub String);

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTargetError(s.to_string()))
    }
}
