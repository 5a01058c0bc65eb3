//! `btw toggle`: interactive list for switching workflows on and off.

use std::io::{Stdout, Write as _};
use std::process::ExitCode;

use anyhow::{Context, Result};
use btw_common::Target;
use clap::Args;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::toggle::{
    self, ERROR_DISPLAY, ToggleCommand, ToggleItem, ToggleSession, ToggleView,
};
use crate::commands::ScopeArgs;
use crate::output::Styles;

/// Arguments for the toggle command.
#[derive(Args, Debug)]
pub struct ToggleArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Always append to the shared document instead of replacing a stale region
    #[arg(long)]
    pub merge: bool,

    /// Do not back up files before overwriting them
    #[arg(long)]
    pub no_backup: bool,
}

/// Run the toggle command.
///
/// # Errors
///
/// Returns an error if output is not an interactive terminal or the library
/// cannot be read.
pub async fn run(app: &AppContext, args: &ToggleArgs) -> Result<ExitCode> {
    if app.is_json() || !app.output.is_tty {
        anyhow::bail!("btw toggle needs an interactive terminal; use inject/eject instead");
    }
    let config = config_service::load_config(&app.config_store)?;
    let scope = args.scope.resolve(app, &config)?;
    let catalog = app.catalog(&config)?;
    let session = ToggleSession {
        target: scope.target,
        project_root: scope.project_root,
        backup: config.inject.backup && !args.no_backup,
        merge: args.merge || config.inject.merge,
        error_display: ERROR_DISPLAY,
    };

    let mut view = TerminalView::open(scope.target, app.output.styles.clone())?;
    let outcome = toggle::run(&app.engine, &catalog, &mut view, &session).await;
    drop(view);
    outcome?;
    Ok(ExitCode::SUCCESS)
}

/// Full-screen raw-mode renderer; restores the terminal when dropped.
struct TerminalView {
    out: Stdout,
    target: Target,
    styles: Styles,
}

impl TerminalView {
    fn open(target: Target, styles: Styles) -> Result<Self> {
        let mut out = std::io::stdout();
        terminal::enable_raw_mode().context("cannot enable raw terminal mode")?;
        execute!(out, EnterAlternateScreen, Hide).context("cannot prepare terminal")?;
        Ok(Self {
            out,
            target,
            styles,
        })
    }

    fn line(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}\r\n")?;
        Ok(())
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl ToggleView for TerminalView {
    fn render(&mut self, items: &[ToggleItem], selected: usize) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        let title = format!("btw workflows for {}", self.target);
        self.line(&format!("{}", title.style(self.styles.header)))?;
        self.line("")?;
        if items.is_empty() {
            self.line("  No workflows in the library support this target.")?;
        }
        for (index, item) in items.iter().enumerate() {
            let mark = if item.active {
                format!("{}", "[x]".style(self.styles.active))
            } else {
                "[ ]".to_string()
            };
            let row = format!("{mark} {:<24} {}", item.label, item.description);
            if index == selected {
                self.line(&format!("> {}", row.style(self.styles.selected)))?;
            } else {
                self.line(&format!("  {row}"))?;
            }
        }
        self.line("")?;
        let help = "↑/k ↓/j move · space/enter toggle · q quit";
        self.line(&format!("{}", help.style(self.styles.dim)))?;
        self.out.flush()?;
        Ok(())
    }

    fn show_busy(&mut self, item: &ToggleItem) -> Result<()> {
        let verb = if item.active { "Ejecting" } else { "Injecting" };
        self.line(&format!("{verb} {}...", item.workflow_id))?;
        self.out.flush()?;
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<()> {
        let text = format!("✗ {}", message.replace('\n', " "));
        self.line(&format!("{}", text.style(self.styles.error)))?;
        self.out.flush()?;
        Ok(())
    }

    async fn next_command(&mut self) -> Result<ToggleCommand> {
        loop {
            let event = tokio::task::spawn_blocking(crossterm::event::read)
                .await
                .context("key reader stopped")??;
            let Event::Key(key) = event else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let command = match key.code {
                KeyCode::Up | KeyCode::Char('k') => ToggleCommand::Up,
                KeyCode::Down | KeyCode::Char('j') => ToggleCommand::Down,
                KeyCode::Enter | KeyCode::Char(' ') => ToggleCommand::Toggle,
                KeyCode::Esc | KeyCode::Char('q') => ToggleCommand::Quit,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    ToggleCommand::Quit
                }
                _ => continue,
            };
            return Ok(command);
        }
    }
}
