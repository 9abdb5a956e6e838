//! Dashboard event loop.
//!
//! Drives the controller from a single loop: periodic ticks, key handling,
//! focus-based pause/resume, and applying refresh outcomes as they arrive on
//! the controller's channel.

use anyhow::Result;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sira_common::DashboardConfig;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::client::SiraClient;
use crate::controller::{ControllerEvent, DashboardController};
use super::render::draw_dashboard;
use super::state::DashboardState;

/// Run the interactive dashboard until the user quits.
pub async fn run(config: DashboardConfig) -> Result<()> {
    let client = Arc::new(SiraClient::new(&config)?);
    let (mut controller, mut rx) =
        DashboardController::new(client, Duration::from_secs(config.refresh_secs));
    let mut state = DashboardState::default();

    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Run siractl in a real terminal (TTY).",
            e
        )
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    controller.start();

    let result = run_event_loop(&mut terminal, &mut controller, &mut state, &mut rx).await;

    // Teardown before the terminal is restored: anything still in flight
    // resolves against a stopped controller and is discarded.
    controller.stop();
    let cleanup = restore_terminal(&mut terminal);
    result.and(cleanup)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut DashboardController,
    state: &mut DashboardState,
    rx: &mut mpsc::Receiver<ControllerEvent>,
) -> Result<()> {
    loop {
        controller.tick();

        while let Ok(outcome) = rx.try_recv() {
            controller.apply(state, outcome);
        }

        state.prune_toasts(Instant::now());
        state.loading = controller.is_loading();
        state.auto_paused = !controller.is_armed();

        terminal.draw(|f| draw_dashboard(f, state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::FocusLost => controller.pause(),
            Event::FocusGained => controller.resume(),
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
                    break;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('r') => controller.refresh_now(),
                    KeyCode::Down | KeyCode::Char('j') => state.select_next_alert(),
                    KeyCode::Up | KeyCode::Char('k') => state.select_prev_alert(),
                    KeyCode::Enter | KeyCode::Char('x') => {
                        if let Some(id) = state.selected_alert_id() {
                            controller.resolve_alert(id);
                        }
                    }
                    KeyCode::Char('d') => state.dismiss_toasts(),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(())
}
