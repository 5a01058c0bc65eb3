//! Per-target scaffold profiles: the closed table every strategy is built
//! from.
//!
//! Pure data plus path helpers; no filesystem access.

use std::path::{Path, PathBuf};

use btw_common::Target;

/// Suffix appended to an artifact path to form its backup sibling.
pub const BACKUP_SUFFIX: &str = ".btw-backup";

/// Scaffold layout and rendering knobs for one target.
#[derive(Debug)]
pub struct TargetProfile {
    pub target: Target,
    /// Directory holding per-agent artifacts, relative to the project root.
    pub scaffold_dir: &'static str,
    /// Artifact file extension, without the leading dot.
    pub extension: &'static str,
    /// Shared configuration document, relative to the project root.
    pub shared_document: &'static str,
    /// Model-name translations; names not listed pass through unchanged.
    pub models: &'static [(&'static str, &'static str)],
    /// Static header lines appended after the common fields.
    pub extra_header: &'static [(&'static str, &'static str)],
}

static CLAUDE: TargetProfile = TargetProfile {
    target: Target::Claude,
    scaffold_dir: ".claude/agents",
    extension: "md",
    shared_document: "CLAUDE.md",
    models: &[
        ("claude-3-5-sonnet", "sonnet"),
        ("claude-3-7-sonnet", "sonnet"),
        ("claude-sonnet-4", "sonnet"),
        ("claude-3-opus", "opus"),
        ("claude-opus-4", "opus"),
        ("claude-3-haiku", "haiku"),
        ("claude-3-5-haiku", "haiku"),
    ],
    extra_header: &[],
};

static CURSOR: TargetProfile = TargetProfile {
    target: Target::Cursor,
    scaffold_dir: ".cursor/rules",
    extension: "mdc",
    shared_document: ".cursorrules",
    models: &[
        ("sonnet", "claude-3.5-sonnet"),
        ("claude-3-5-sonnet", "claude-3.5-sonnet"),
        ("claude-3-7-sonnet", "claude-3.7-sonnet"),
        ("opus", "claude-3-opus"),
        ("haiku", "claude-3.5-haiku"),
    ],
    extra_header: &[("alwaysApply", "false")],
};

static WINDSURF: TargetProfile = TargetProfile {
    target: Target::Windsurf,
    scaffold_dir: ".windsurf/rules",
    extension: "md",
    shared_document: ".windsurfrules",
    models: &[
        ("sonnet", "claude-3.5-sonnet"),
        ("claude-3-5-sonnet", "claude-3.5-sonnet"),
        ("opus", "claude-3-opus"),
    ],
    extra_header: &[("trigger", "manual")],
};

static COPILOT: TargetProfile = TargetProfile {
    target: Target::Copilot,
    scaffold_dir: ".github/chatmodes",
    extension: "chatmode.md",
    shared_document: ".github/copilot-instructions.md",
    models: &[
        ("sonnet", "Claude Sonnet 3.5"),
        ("claude-3-5-sonnet", "Claude Sonnet 3.5"),
        ("claude-3-7-sonnet", "Claude Sonnet 3.7"),
        ("gpt-4o", "GPT-4o"),
        ("gpt-4.1", "GPT-4.1"),
    ],
    extra_header: &[],
};

/// Look up the profile for a target.
#[must_use]
pub fn profile(target: Target) -> &'static TargetProfile {
    match target {
        Target::Claude => &CLAUDE,
        Target::Cursor => &CURSOR,
        Target::Windsurf => &WINDSURF,
        Target::Copilot => &COPILOT,
    }
}

impl TargetProfile {
    #[must_use]
    pub fn scaffold_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(self.scaffold_dir)
    }

    #[must_use]
    pub fn shared_document_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(self.shared_document)
    }

    #[must_use]
    pub fn artifact_path(&self, project_root: &Path, agent_id: &str) -> PathBuf {
        self.scaffold_path(project_root)
            .join(format!("{agent_id}.{}", self.extension))
    }

    /// Returns `true` if `file_name` looks like an artifact of this target.
    /// Backup siblings never qualify.
    #[must_use]
    pub fn is_artifact_name(&self, file_name: &str) -> bool {
        !is_backup_name(file_name)
            && file_name
                .strip_suffix(self.extension)
                .and_then(|stem| stem.strip_suffix('.'))
                .is_some_and(|stem| !stem.is_empty())
    }

    /// Translate a model name through the target's table.
    #[must_use]
    pub fn map_model<'a>(&self, model: &'a str) -> &'a str {
        self.models
            .iter()
            .find(|(from, _)| *from == model)
            .map_or(model, |&(_, to)| to)
    }
}

/// Returns `true` for backup siblings.
#[must_use]
pub fn is_backup_name(file_name: &str) -> bool {
    file_name.ends_with(BACKUP_SUFFIX)
}

/// The backup sibling of `path`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(BACKUP_SUFFIX);
    PathBuf::from(os)
}
