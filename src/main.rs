/*!
 * Command-line interface for ShelfView
 */

use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use shelfview::app::App;
use shelfview::config::{Args, Config};
use shelfview::error::Result;
use shelfview::storage::PrefStore;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Shell completion generation short-circuits everything else
    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "shelfview", &mut io::stdout());
        return Ok(());
    }

    // Create and validate configuration
    let config = Config::from_args(args);
    config.validate()?;

    init_logging(&config)?;

    // Open the preferences store
    let store = match &config.data_dir {
        Some(dir) => PrefStore::open(dir.clone()),
        None => PrefStore::open_default()?,
    };

    let mut app = App::new(config, store)?;

    // The terminal must be restored even when the loop errors, or the shell
    // is left in raw mode.
    let mut terminal = setup_terminal()?;
    let outcome = app.run(&mut terminal);
    restore_terminal(&mut terminal)?;

    outcome
}

/// Route log output to the configured file; without one, logging stays off
/// since stderr belongs to the terminal UI.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelfview=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
