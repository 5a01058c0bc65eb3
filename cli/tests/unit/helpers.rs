//! Shared test helpers: an in-memory `ProjectFs`, a fixed workflow catalog
//! and manifest fixtures.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, bail};
use btw_cli::application::ports::{ProjectFs, WorkflowCatalog};
use btw_cli::domain::target::backup_path;
use btw_common::{AgentDefinition, Manifest, Target};

/// Project root used by every in-memory test.
pub const ROOT: &str = "/work/project";

pub fn root() -> PathBuf {
    PathBuf::from(ROOT)
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn agent(id: &str) -> AgentDefinition {
    AgentDefinition {
        id: id.to_string(),
        name: format!("Agent {id}"),
        description: "d".to_string(),
        system_prompt: "p".to_string(),
        model: None,
        tags: Vec::new(),
    }
}

/// A manifest supporting every target.
pub fn manifest(id: &str, agent_ids: &[&str]) -> Manifest {
    Manifest {
        id: id.to_string(),
        name: format!("Workflow {id}"),
        description: format!("The {id} workflow"),
        version: "1.0.0".to_string(),
        targets: Target::ALL.into_iter().collect(),
        agents: agent_ids.iter().map(|a| agent(a)).collect(),
        author: None,
        repository: None,
    }
}

/// Strip the volatile `injected:` timestamps so two renders can be compared.
pub fn without_timestamps(content: &str) -> String {
    content
        .lines()
        .filter(|l| {
            !l.starts_with("# injected:")
                && !l.contains("| injected:")
                && !l.starts_with("_Generated by")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── In-memory filesystem ─────────────────────────────────────────────────────

#[derive(Default)]
struct FsState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    mutations: usize,
    fail_backups: bool,
    fail_writes: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

/// `ProjectFs` over a map of paths, counting every mutating call.
#[derive(Default)]
pub struct InMemoryFs {
    state: Mutex<FsState>,
}

impl InMemoryFs {
    /// An empty filesystem holding only the project root.
    pub fn project() -> Self {
        let fs = Self::default();
        fs.mkdirs(&root());
        fs
    }

    fn mkdirs(&self, path: &Path) {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            state.dirs.insert(ancestor.to_path_buf());
        }
    }

    /// Seed a file (and its parent directories) without counting a mutation.
    pub fn put(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.mkdirs(parent);
        }
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_path_buf(), content.to_string());
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().unwrap().files.get(path.as_ref()).cloned()
    }

    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().unwrap().dirs.contains(path.as_ref())
    }

    /// Every file path currently stored.
    pub fn files(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }

    /// Number of write/create/remove/backup/restore calls so far.
    pub fn mutations(&self) -> usize {
        self.state.lock().unwrap().mutations
    }

    pub fn fail_backups(&self) {
        self.state.lock().unwrap().fail_backups = true;
    }

    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.state
            .lock()
            .unwrap()
            .fail_writes
            .insert(path.as_ref().to_path_buf());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_backups = false;
        state.fail_writes.clear();
        state.unreadable.clear();
    }

    pub fn make_unreadable(&self, path: impl AsRef<Path>) {
        self.state
            .lock()
            .unwrap()
            .unreadable
            .insert(path.as_ref().to_path_buf());
    }
}

impl ProjectFs for InMemoryFs {
    async fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.state.lock().unwrap();
        if state.unreadable.contains(path) {
            bail!("permission denied: {}", path.display());
        }
        match state.files.get(path) {
            Some(content) => Ok(content.clone()),
            None => bail!("no such file: {}", path.display()),
        }
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        if state.fail_writes.contains(path) {
            bail!("disk full: {}", path.display());
        }
        let parent_ok = path.parent().is_some_and(|p| state.dirs.contains(p));
        if !parent_ok {
            bail!("parent directory missing: {}", path.display());
        }
        state.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.state.lock().unwrap().mutations += 1;
        self.mkdirs(path);
        Ok(())
    }

    async fn remove(&self, path: &Path, recursive: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        if state.files.remove(path).is_some() {
            return Ok(());
        }
        if !state.dirs.contains(path) {
            bail!("no such file or directory: {}", path.display());
        }
        let has_children = state.files.keys().any(|f| f.starts_with(path))
            || state.dirs.iter().any(|d| d != path && d.starts_with(path));
        if has_children && !recursive {
            bail!("directory not empty: {}", path.display());
        }
        state.files.retain(|f, _| !f.starts_with(path));
        state.dirs.retain(|d| !d.starts_with(path));
        Ok(())
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        if !state.dirs.contains(path) {
            bail!("not a directory: {}", path.display());
        }
        let mut entries: Vec<PathBuf> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        entries.sort();
        Ok(entries)
    }

    async fn backup(&self, path: &Path) -> Result<PathBuf> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        if state.fail_backups {
            bail!("backup volume unavailable");
        }
        let Some(content) = state.files.get(path).cloned() else {
            bail!("no such file: {}", path.display());
        };
        let backup = backup_path(path);
        state.files.insert(backup.clone(), content);
        Ok(backup)
    }

    async fn restore(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        let backup = backup_path(path);
        let Some(content) = state.files.remove(&backup) else {
            bail!("no backup for {}", path.display());
        };
        state.files.insert(path.to_path_buf(), content);
        Ok(())
    }
}

// ── Fixed catalog ────────────────────────────────────────────────────────────

/// `WorkflowCatalog` over a fixed list of manifests.
#[derive(Default)]
pub struct StaticCatalog {
    pub manifests: Vec<Manifest>,
}

impl StaticCatalog {
    pub fn new(manifests: Vec<Manifest>) -> Self {
        Self { manifests }
    }
}

impl WorkflowCatalog for StaticCatalog {
    async fn list(&self) -> Result<Vec<Manifest>> {
        Ok(self.manifests.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Manifest>> {
        Ok(self.manifests.iter().find(|m| m.id == id).cloned())
    }
}
