//! Operator console

mod app;
mod ui;

pub use app::App;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::time::Duration;

/// Redraw interval while idle
const TICK: Duration = Duration::from_millis(100);

/// Take over the terminal and run the console until the operator quits
pub async fn run(mut app: App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        let state = app.dashboard.snapshot();
        let toasts = app.dashboard.toaster().visible();
        terminal.draw(|f| ui::draw(f, app, &state, &toasts))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()?
                && matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
                && app.handle_key(key.code, &state)
            {
                return Ok(());
            }
        } else {
            // let spawned fetches make progress between redraws
            tokio::task::yield_now().await;
        }
    }
}
