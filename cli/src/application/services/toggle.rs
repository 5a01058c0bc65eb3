//! Application service: the interactive toggle loop.
//!
//! A small state machine: `Listing → Busy → (Listing | Error → Listing) →
//! Exited`. The item list is rebuilt from the library and a fresh status scan
//! on every pass through `Listing`; nothing is patched in memory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use btw_common::{InjectionStatus, Target};
use serde::Serialize;

use crate::application::ports::WorkflowCatalog;
use crate::application::services::engine::Injector;
use crate::application::services::strategy::{EjectOptions, InjectOptions};

/// How long an error stays on screen before the list comes back.
pub const ERROR_DISPLAY: Duration = Duration::from_secs(2);

/// One row of the toggle list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleItem {
    pub workflow_id: String,
    pub label: String,
    pub description: String,
    pub active: bool,
}

/// A user command read while listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleCommand {
    Up,
    Down,
    Toggle,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoopState {
    Listing,
    Busy(ToggleItem),
    Error(String),
    Exited,
}

/// The terminal side of the loop.
#[allow(async_fn_in_trait)]
pub trait ToggleView {
    /// Draw `items` with `selected` highlighted.
    fn render(&mut self, items: &[ToggleItem], selected: usize) -> Result<()>;
    /// Indicate that `item` is being toggled.
    fn show_busy(&mut self, item: &ToggleItem) -> Result<()>;
    /// Show a failed toggle.
    fn show_error(&mut self, message: &str) -> Result<()>;
    /// Wait for the next command.
    async fn next_command(&mut self) -> Result<ToggleCommand>;
}

/// Caller configuration that toggles pass through.
#[derive(Debug, Clone)]
pub struct ToggleSession {
    pub target: Target,
    pub project_root: PathBuf,
    pub backup: bool,
    pub merge: bool,
    pub error_display: Duration,
}

/// Build the list: every library workflow supporting the target, plus any
/// workflow that owns artifacts but is no longer in the library.
///
/// # Errors
///
/// Returns an error if the library cannot be enumerated.
pub async fn load_items(
    injector: &impl Injector,
    catalog: &impl WorkflowCatalog,
    target: Target,
    project_root: &Path,
) -> Result<Vec<ToggleItem>> {
    let status = injector.get_status(target, project_root).await;
    let manifests = catalog.list().await.context("failed to list workflows")?;
    let mut items: Vec<ToggleItem> = manifests
        .into_iter()
        .filter(|m| m.supports(target))
        .map(|m| ToggleItem {
            active: status.is_owned_by(&m.id),
            workflow_id: m.id,
            label: m.name,
            description: m.description,
        })
        .collect();
    items.extend(orphans(&status, &items));
    Ok(items)
}

fn orphans(status: &InjectionStatus, listed: &[ToggleItem]) -> Vec<ToggleItem> {
    status
        .workflow_ids
        .iter()
        .filter(|id| !listed.iter().any(|item| &item.workflow_id == *id))
        .map(|id| ToggleItem {
            workflow_id: id.clone(),
            label: id.clone(),
            description: "not in the workflow library".to_string(),
            active: true,
        })
        .collect()
}

/// Run the loop until the user quits.
///
/// # Errors
///
/// Returns an error if the view fails or the library cannot be listed.
/// Toggle failures are shown and do not end the loop.
pub async fn run(
    injector: &impl Injector,
    catalog: &impl WorkflowCatalog,
    view: &mut impl ToggleView,
    session: &ToggleSession,
) -> Result<()> {
    let mut selected = 0usize;
    let mut state = LoopState::Listing;
    loop {
        state = match state {
            LoopState::Listing => {
                let items =
                    load_items(injector, catalog, session.target, &session.project_root).await?;
                selected = selected.min(items.len().saturating_sub(1));
                view.render(&items, selected)?;
                match view.next_command().await? {
                    ToggleCommand::Quit => LoopState::Exited,
                    ToggleCommand::Up => {
                        selected = step_up(selected, items.len());
                        LoopState::Listing
                    }
                    ToggleCommand::Down => {
                        selected = step_down(selected, items.len());
                        LoopState::Listing
                    }
                    ToggleCommand::Toggle => items
                        .get(selected)
                        .cloned()
                        .map_or(LoopState::Listing, LoopState::Busy),
                }
            }
            LoopState::Busy(item) => {
                view.show_busy(&item)?;
                match toggle(injector, catalog, &item, session).await {
                    Ok(()) => LoopState::Listing,
                    Err(e) => LoopState::Error(format!("{e:#}")),
                }
            }
            LoopState::Error(message) => {
                view.show_error(&message)?;
                tokio::time::sleep(session.error_display).await;
                LoopState::Listing
            }
            LoopState::Exited => return Ok(()),
        };
    }
}

/// Flip one item: an explicit toggle always forces injection.
async fn toggle(
    injector: &impl Injector,
    catalog: &impl WorkflowCatalog,
    item: &ToggleItem,
    session: &ToggleSession,
) -> Result<()> {
    if item.active {
        let options = EjectOptions {
            project_root: session.project_root.clone(),
            workflow_id: Some(item.workflow_id.clone()),
            clean: false,
            restore: false,
        };
        injector.eject(session.target, &options).await?;
        return Ok(());
    }

    let manifest = catalog
        .get(&item.workflow_id)
        .await?
        .with_context(|| format!("Workflow '{}' is not installed", item.workflow_id))?;
    let options = InjectOptions {
        project_root: session.project_root.clone(),
        backup: session.backup,
        force: true,
        merge: session.merge,
    };
    injector.inject(&manifest, session.target, &options).await?;
    Ok(())
}

fn step_up(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if selected == 0 {
        len - 1
    } else {
        selected - 1
    }
}

fn step_down(selected: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (selected + 1) % len }
}
