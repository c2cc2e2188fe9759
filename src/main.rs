//! loancalc - Terminal Loan Calculator
//!
//! A terminal front-end that collects loan parameters, validates them,
//! and displays the amortization breakdown computed by a remote loan
//! service. The service call runs on a worker thread so the interface
//! stays responsive while a calculation is in flight.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use loancalc::application::{App, AppMode};
use loancalc::config::Config;
use loancalc::infrastructure::{logging, HttpLoanService};
use loancalc::presentation::{render_ui, InputHandler};

const TICK: Duration = Duration::from_millis(100);

/// Entry point for the terminal loan calculator.
///
/// Parses configuration, starts file logging, sets up the terminal, and
/// runs the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if logging or terminal setup fails, or if the
/// terminal fails while running.
fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init_file_logging(&config.log_file, &config.log_level)?;

    let service = HttpLoanService::new(&config.service_url).context("cannot build HTTP client")?;
    info!(endpoint = service.endpoint(), "starting loancalc");
    let mut app = App::new(Arc::new(service));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "event loop failed");
        return Err(err.into());
    }

    info!("exiting");
    Ok(())
}

/// Main application event loop.
///
/// Redraws every tick, applies a finished calculation as soon as it
/// arrives, and forwards key presses to the input handler. Returns when
/// the user presses 'q' in normal mode or Ctrl+C anywhere.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_pending();
        app.tick();
        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
