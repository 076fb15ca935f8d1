//! Terminal user interface built on ratatui
//!
//! A materials list, or one of the practice games, with stacked modal
//! dialogs on top. Dialog outcomes and
//! lifecycle notifications come back through the same event channel as
//! terminal input, so every change triggers a redraw.

mod app;
mod dialog;
mod events;
mod form;
mod keys;
mod practice;
mod render;
mod styles;

pub use app::App;
pub use dialog::AppDialog;
pub use events::{Event, EventHandler};
pub use keys::KeyMap;

use crate::config::Config;
use crate::materials::MaterialRepository;
use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tracing::info;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal(mouse_enabled: bool) -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main TUI entry point
pub async fn run(config: &Config, repository: MaterialRepository) -> Result<()> {
    let mut event_handler = EventHandler::new(Duration::from_millis(config.tick_rate_ms));
    let mut app = App::new(config, repository, event_handler.sender())?;
    app.dialogs.set_event_sender(event_handler.forward_dialog_events());

    let mut terminal = init_terminal(config.mouse_enabled)?;
    event_handler.start();
    info!("Terminal UI started");

    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    // Pending dialogs settle as cancelled before the terminal goes away
    app.dialogs.close_all();
    restore_terminal(&mut terminal)?;
    info!("Terminal UI stopped");
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        match event_handler.next().await {
            Some(event) => {
                if app.handle_event(event)? {
                    break; // Exit requested
                }
            }
            None => break,
        }
    }
    Ok(())
}
