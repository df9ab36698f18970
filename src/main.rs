//! Founders Fuel - application intake client
//!
//! Terminal front end for the Founders Fuel intake API. Founders log in or
//! register, fill in the five-step application and submit it; the session is
//! kept on disk between runs.

use std::io;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use founders_fuel::application::{App, AppMode};
use founders_fuel::infrastructure::{init_logging, ApiClient, Config, FileStore, HttpTransport, SessionStore};
use founders_fuel::presentation::{render_ui, InputHandler};

/// Entry point for the intake client.
///
/// Parses the configuration, sets up logging, restores the saved session and
/// runs the terminal UI until the user quits.
///
/// # Errors
///
/// Returns an error if the log or session file cannot be opened, the HTTP
/// client cannot be built, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_logging(&config.log_path())?;
    tracing::info!(api_url = %config.api_url, "starting founders-fuel");

    let session = SessionStore::new(Box::new(FileStore::open(config.session_path())?));
    let transport = HttpTransport::new(&config.api_url, config.timeout())?;
    let mut app = App::new(ApiClient::new(Box::new(transport)), session);
    app.refresh_current_user();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::warn!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }

    tracing::info!("exiting");
    Ok(())
}

/// Main event loop.
///
/// Draws, then either runs the action queued by the previous key (so its
/// busy state is on screen while the request is out) or waits for a key.
/// `q` on the landing screen quits.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if app.has_pending() {
            app.process_pending();
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q')
                        if app.mode() == AppMode::Landing && app.active_notice().is_none() =>
                    {
                        return Ok(())
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
