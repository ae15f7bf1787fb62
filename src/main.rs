// src/main.rs

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use serde::Serialize;
use std::io::{Read, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};
use vanguard_posture::core::error::ScanError;
use vanguard_posture::core::models::FullScanReport;
use vanguard_posture::PostureScanner;

mod app;
mod cli;
mod logging;
mod ui;

use app::{App, AppState};
use cli::{Cli, Commands};

type ScanOutcome = Result<FullScanReport, ScanError>;

// Logging reads the local UTC offset, which `time` only allows while the
// process is single-threaded, so the runtime is built afterwards.
fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let scanner = PostureScanner::new(cli.scan_config()?)?;
    info!(config = ?scanner.config(), "Vanguard Posture starting.");

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => run_tui(scanner).await,
        Commands::Headers { target, checks } => {
            print_json(&scanner.evaluate_headers(&target, &checks).await?)
        }
        Commands::Dns { target, checks } => {
            print_json(&scanner.evaluate_dns(&target, &checks).await?)
        }
        Commands::Request { kind, file } => {
            let payload = read_payload(file)?;
            print_json(&scanner.handle_request(kind, &payload).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_payload(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("could not read request file {}", path.display())),
        None => {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .wrap_err("could not read request from stdin")?;
            Ok(payload)
        }
    }
}

async fn run_tui(scanner: PostureScanner) -> Result<()> {
    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, scanner).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, scanner: PostureScanner) -> Result<()> {
    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<ScanOutcome>(1);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &scanner, &tx)?;
        }

        if let Ok(outcome) = rx.try_recv() {
            if let Err(e) = &outcome {
                error!(error = %e, "Scan failed.");
            }
            app.finish_scan(outcome);
        }
        app.on_tick();
    }
    Ok(())
}

fn handle_events(app: &mut App, scanner: &PostureScanner, tx: &mpsc::Sender<ScanOutcome>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if app.show_disclaimer {
            match key.code {
                KeyCode::Enter => app.acknowledge_disclaimer(),
                KeyCode::Esc | KeyCode::Char('q') => app.quit(),
                _ => {}
            }
            return Ok(());
        }
        match app.state {
            AppState::Idle => handle_idle_input(app, key.code, scanner, tx),
            AppState::Scanning => handle_scanning_input(app, key.code),
            AppState::Finished => handle_finished_input(app, key.code),
        }
    }
    Ok(())
}

fn handle_idle_input(
    app: &mut App,
    key_code: KeyCode,
    scanner: &PostureScanner,
    tx: &mpsc::Sender<ScanOutcome>,
) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            let Some(target) = app.start_scan() else {
                return;
            };
            let scanner = scanner.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = scanner.run_full_scan(&target).await;
                let _ = tx.send(outcome).await;
            });
        }
        _ => {}
    }
}

fn handle_scanning_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('l') => app.toggle_logs(),
        KeyCode::Left => app.scroll_logs_left(),
        KeyCode::Right => app.scroll_logs_right(),
        _ => {}
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('l') => app.toggle_logs(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::Left => app.scroll_logs_left(),
        KeyCode::Right => app.scroll_logs_right(),
        _ => {}
    }
}
