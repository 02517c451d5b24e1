//! Tallypad terminal calculator.
//!
//! A keypad calculator in the terminal: type keys or click the on-screen
//! keypad, with a running tape of completed evaluations. `--replay` loads a
//! recorded key script (JSON) before the first frame.

mod app;
mod input;
mod keypad;
mod ui;

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tallypad::prelude::KeyScript;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;

/// How long one event poll blocks before redrawing.
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "tallypad", version, about = "Keypad calculator for the terminal")]
struct Args {
    /// Key script (JSON) to replay before the first frame
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Log filter, e.g. `tallypad=debug`; logs go to stderr
    #[arg(long, env = "TALLYPAD_LOG", default_value = "warn")]
    log_filter: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_filter))
        .with_writer(io::stderr)
        .init();

    let mut app = App::new();
    if let Some(path) = &args.replay {
        let json = std::fs::read_to_string(path)?;
        let script = KeyScript::from_json(&json)?;
        app.replay(&script);
        info!(path = %path.display(), keys = script.keys.len(), "replayed key script");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal before surfacing any loop error.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Draw/poll loop. Returns when a quit action has been handled.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit() {
            return Ok(());
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = input::map_key(&key) {
                        app.handle_action(action);
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(&mouse),
                _ => {}
            }
        }
    }
}
