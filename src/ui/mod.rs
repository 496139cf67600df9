//! Terminal UI
//!
//! Screen flow Login → Register / Verify → Dashboard. The event loop
//! multiplexes terminal input, a redraw tick, and poller snapshots; all
//! state lives in [`App`], all drawing in [`view`].

mod app;
mod particles;
mod view;

pub use app::{App, Screen};
pub use particles::ParticleField;

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::client::ApiClient;
use crate::config::Config;

/// Restores the terminal even if the UI loop panics.
struct TerminalCleanup;

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the full-screen client until the user quits.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.server)?;
    let mut app = App::new(api, &config);

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let _cleanup = TerminalCleanup;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventStream::new();
    let mut tick =
        tokio::time::interval(Duration::from_millis(config.ui.tick_rate_ms.clamp(50, 1000)));
    let mut updates = None;

    while !app.should_quit {
        terminal.draw(|frame| view::render(frame, &app))?;

        // A dashboard entry hands us the new poller's update stream.
        if let Some(rx) = app.take_updates() {
            updates = Some(rx);
        }

        let snapshot = async {
            match updates.as_mut() {
                Some(rx) => match rx.changed().await {
                    Ok(()) => Some(rx.borrow_and_update().clone()),
                    Err(_) => None,
                },
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = tick.tick() => app.on_tick(),
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.on_key(key).await;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "terminal event stream error");
                    app.should_quit = true;
                }
                None => app.should_quit = true,
            },
            snap = snapshot => match snap {
                Some(snapshot) => app.set_snapshot(snapshot),
                // Poller stopped (permanent failure); the last snapshot
                // keeps rendering.
                None => updates = None,
            },
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    std::mem::forget(_cleanup);
    Ok(())
}
