//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use btw_common::Target;
use thiserror::Error;

/// Machine-readable code carried by every [`InjectionError`].
pub const INJECTION_FAILED: &str = "INJECTION_FAILED";

// ── Injection errors ──────────────────────────────────────────────────────────

/// Broad classification callers branch on instead of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was rejected before anything was written.
    Precondition,
    /// An underlying read/write/remove failed partway through.
    Io,
}

/// Errors raised by `inject` / `eject`.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("Workflow '{workflow_id}' is already injected for {target}. Re-run with --force to replace it.")]
    AlreadyInjected { workflow_id: String, target: Target },

    #[error("Workflow '{workflow_id}' does not support target '{target}'.")]
    TargetMismatch { workflow_id: String, target: Target },

    #[error("Unsupported target '{0}'. Supported targets: claude, cursor, windsurf, copilot")]
    UnsupportedTarget(String),

    #[error("Workflow manifest validation failed:\n{0}")]
    InvalidManifest(String),

    #[error("{} already exists and {}; refusing to overwrite it.", path.display(), conflict_owner(owner.as_deref()))]
    ArtifactConflict {
        path: PathBuf,
        owner: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn conflict_owner(owner: Option<&str>) -> String {
    match owner {
        Some(id) => format!("belongs to workflow '{id}'"),
        None => "has no btw marker (use --force to overwrite)".to_string(),
    }
}

impl InjectionError {
    /// Wrap an underlying I/O failure with a human-readable message.
    pub fn io(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        let source: anyhow::Error = source.into();
        Self::Io {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            _ => ErrorKind::Precondition,
        }
    }

    /// The single tagged failure code shared by every variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        INJECTION_FAILED
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
