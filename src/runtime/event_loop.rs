use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Action, App, Msg};
use crate::config;
use crate::dispatch::Dispatcher;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: drains finished operations into the reducer,
/// draws, and turns key presses into actions. Returns when the app asks to quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    dispatcher: &Dispatcher,
    msg_rx: &mpsc::Receiver<Msg>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    for op in app.init() {
        dispatcher.dispatch(op, app.connection());
    }

    loop {
        while let Ok(msg) = msg_rx.try_recv() {
            step(app, dispatcher, msg);
        }
        if app.should_quit {
            break;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = map_key(key, state) {
                    step(app, dispatcher, Msg::Input(action));
                }
            }
        }
        if app.should_quit {
            break;
        }
    }

    tracing::info!("quit requested");
    Ok(())
}

/// Fold one message and start whatever it asks for.
fn step(app: &mut App, dispatcher: &Dispatcher, msg: Msg) {
    for op in app.update(msg) {
        dispatcher.dispatch(op, app.connection());
    }
}

fn map_key(key: KeyEvent, state: &mut EventLoopState) -> Option<Action> {
    let was_pending_gg = std::mem::take(&mut state.pending_gg);

    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::Down,
        KeyCode::Char('k') | KeyCode::Up => Action::Up,
        KeyCode::Char('g') => {
            if was_pending_gg {
                Action::Top
            } else {
                state.pending_gg = true;
                return None;
            }
        }
        KeyCode::Home => Action::Top,
        KeyCode::Char('G') | KeyCode::End => Action::Bottom,
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Action::Enter,
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => Action::Back,
        KeyCode::Tab => Action::SwitchView,
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePause,
        KeyCode::Char('n') => Action::Next,
        KeyCode::Char('N') | KeyCode::Char('b') => Action::Previous,
        KeyCode::Char('K') => Action::ToggleInfo,
        KeyCode::Char('r') => Action::Reconnect,
        _ => return None,
    };
    Some(action)
}
