use std::sync::{Arc, mpsc};
use std::time::Duration;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, View};
use crate::config::{Settings, StartView};
use crate::dispatch::{Deadlines, Dispatcher};
use crate::doctor;
use crate::mpd::TcpConnector;

mod event_loop;
mod logging;
mod settings;

pub use settings::load_settings;

fn io_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("allegro-io")
        .build()
        .context("build tokio runtime")
}

pub fn run_tui(settings: Settings) -> anyhow::Result<()> {
    match logging::init_to_file(&settings.log) {
        Ok(path) => tracing::info!(log = %path.display(), addr = %settings.mpd.addr(), "starting"),
        Err(e) => eprintln!("allegro: logging disabled: {e:#}"),
    }

    let rt = io_runtime()?;
    let (msg_tx, msg_rx) = mpsc::channel();
    let dispatcher = Dispatcher::new(
        rt.handle().clone(),
        msg_tx,
        Arc::new(TcpConnector::new(settings.mpd.clone())),
        Deadlines::new(settings.mpd.timeout()),
    );

    let view = match settings.ui.start_view {
        StartView::Tracks => View::Tracks,
        StartView::Artists => View::Browser,
    };
    let mut app = App::new(settings.ui.tick()).with_view(view);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &dispatcher,
        &msg_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Outstanding idle waits never finish on their own.
    rt.shutdown_timeout(Duration::from_millis(200));
    run_result
}

/// Run the diagnostics and print the report. Returns the process exit code.
pub fn run_doctor(settings: Settings, deep: bool, json: bool) -> anyhow::Result<i32> {
    logging::init_to_stderr(&settings.log);

    let rt = io_runtime()?;
    let report = rt.block_on(doctor::run(&settings.mpd, deep));
    doctor::print(&report, json)?;
    Ok(report.exit_code)
}
