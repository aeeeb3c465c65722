//! TUI Application module

pub mod async_ops;
pub mod chart;
mod events;
pub mod state;
mod ui;

pub use state::{AppState, Tab, TimelineMode};

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;

use crate::api::MastodonClient;
use crate::config::Config;

use async_ops::{AsyncCommand, AsyncHandle, spawn_worker};

/// Run the TUI application
pub fn run() -> Result<()> {
    let rt = Runtime::new()?;

    let config = Config::load()?;
    if !config.has_credentials() {
        bail!("Not logged in. Run `roost login <instance>` first.");
    }

    let client = Arc::new(MastodonClient::new(&config.instance, &config.access_token));
    let async_handle = rt.block_on(async { spawn_worker(client) });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = AppState::new(config);

    // Load the home timeline right away
    if let Some(cmd) = state.select_tab(Tab::Timeline) {
        let _ = async_handle.cmd_tx.blocking_send(cmd);
    }

    let result = run_app(&mut terminal, &mut state, async_handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
) -> Result<()> {
    loop {
        // Apply any finished fetches
        while let Ok(result) = async_handle.result_rx.try_recv() {
            state.apply_result(result);
        }

        // At most one progress tick per turn keeps the loop responsive
        // during a long metrics scan
        state.poll_metrics_progress();

        terminal.draw(|frame| ui::render(frame, state))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && let Some(cmd) = events::handle_key(state, key)
        {
            let _ = async_handle.cmd_tx.blocking_send(cmd);
        }

        if state.should_quit {
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::Shutdown);
            break;
        }
    }

    // Persist theme changes and the like
    state.config.save().context("Failed to save config")?;

    Ok(())
}
