//! Application model: `App` and `ConnState`.
//!
//! `App` is the single owner of client state. It only changes inside
//! [`App::update`], which folds one message and returns the operations the
//! runtime should start next. It never performs I/O itself.

use std::time::Duration;

use crate::library::{LibraryIndex, Track, album_row_label, list_label};
use crate::mpd::{Connection, MpdError, NowPlaying};

use super::messages::{Action, Msg, Op, OpKind, PlaybackAction};
use super::nav::{Level, Navigation, View};

/// Where the connection lifecycle stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnState {
    Disconnected,
    Connecting,
    Loading,
    Ready,
}

pub struct App {
    conn: Option<Connection>,
    pub state: ConnState,
    pub tracks: Vec<Track>,
    pub index: LibraryIndex,
    pub nav: Navigation,
    pub now: NowPlaying,
    pub last_error: Option<String>,
    idle_in_flight: bool,
    /// Bumped on every successful connect; idle results from older
    /// connections are dropped.
    generation: u64,
    pub should_quit: bool,
    pub show_info: bool,
    tick: Duration,
}

impl App {
    /// A disconnected app that animates elapsed time every `tick`.
    pub fn new(tick: Duration) -> Self {
        Self {
            conn: None,
            state: ConnState::Disconnected,
            tracks: Vec::new(),
            index: LibraryIndex::default(),
            nav: Navigation::new(View::Tracks),
            now: NowPlaying::default(),
            last_error: None,
            idle_in_flight: false,
            generation: 0,
            should_quit: false,
            show_info: false,
            tick,
        }
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.nav = Navigation::new(view);
        self
    }

    /// Startup operations.
    pub fn init(&mut self) -> Vec<Op> {
        self.state = ConnState::Connecting;
        vec![Op::Connect, Op::Tick(self.tick)]
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    pub fn idle_in_flight(&self) -> bool {
        self.idle_in_flight
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Op> {
        match msg {
            Msg::Connected(conn) => {
                self.conn = Some(conn);
                self.state = ConnState::Loading;
                self.last_error = None;
                self.generation += 1;
                self.idle_in_flight = true;
                vec![Op::FetchLibrary, Op::RefreshStatus, Op::watch(self.generation)]
            }
            Msg::ConnectFailed(err) => {
                self.conn = None;
                self.state = ConnState::Disconnected;
                self.last_error = Some(err.to_string());
                Vec::new()
            }
            Msg::LibraryLoaded(tracks) => {
                self.index = LibraryIndex::build(&tracks);
                self.tracks = tracks;
                self.state = ConnState::Ready;
                self.nav.reset_browser();
                let len = self.list_len();
                self.nav.clamp(len);
                Vec::new()
            }
            Msg::Status(now) => {
                self.now = now;
                Vec::new()
            }
            Msg::Changed {
                subsystems,
                generation,
            } => self.on_changed(generation, &subsystems),
            Msg::Tick => {
                self.now.advance(self.tick);
                vec![Op::Tick(self.tick)]
            }
            Msg::Failed {
                op: OpKind::Idle(generation),
                ..
            } if generation != self.generation => {
                tracing::debug!(generation, "dropping idle failure from an old connection");
                Vec::new()
            }
            // A long-poll that ran out of time just means nothing changed.
            Msg::Failed {
                op: OpKind::Idle(generation),
                err: MpdError::Timeout(limit),
            } => {
                tracing::debug!(?limit, "idle timed out");
                self.on_changed(generation, &[])
            }
            Msg::Failed { op, err } => {
                tracing::debug!(%op, error = %err, "operation failed");
                self.last_error = Some(format!("{op}: {err}"));
                if matches!(op, OpKind::Idle(_)) {
                    self.idle_in_flight = false;
                }
                if err.is_fatal() {
                    self.conn = None;
                    self.state = ConnState::Disconnected;
                    self.idle_in_flight = false;
                }
                Vec::new()
            }
            Msg::Input(action) => self.on_action(action),
        }
    }

    fn on_changed(&mut self, generation: u64, subs: &[String]) -> Vec<Op> {
        if generation != self.generation {
            tracing::debug!(generation, "dropping idle result from an old connection");
            return Vec::new();
        }
        self.idle_in_flight = false;
        let mut ops = Vec::new();

        let touched = |names: &[&str]| subs.iter().any(|s| names.contains(&s.as_str()));
        if touched(&["player", "mixer", "options", "playlist"]) {
            ops.push(Op::RefreshStatus);
        }
        if touched(&["database", "update"]) {
            ops.push(Op::FetchLibrary);
        }

        if self.conn.is_some() {
            self.idle_in_flight = true;
            ops.push(Op::watch(self.generation));
        }
        ops
    }

    fn on_action(&mut self, action: Action) -> Vec<Op> {
        let len = self.list_len();
        match action {
            Action::Up => self.nav.up(),
            Action::Down => self.nav.down(len),
            Action::Top => self.nav.top(),
            Action::Bottom => self.nav.bottom(len),
            Action::Enter => return self.on_enter(),
            Action::Back => {
                if self.nav.view == View::Browser {
                    self.nav.back();
                }
            }
            Action::SwitchView => self.nav.switch_view(),
            Action::ToggleInfo => self.show_info = !self.show_info,
            Action::Quit => self.should_quit = true,
            Action::TogglePause => return vec![Op::Playback(PlaybackAction::TogglePause)],
            Action::Next => return vec![Op::Playback(PlaybackAction::Next)],
            Action::Previous => return vec![Op::Playback(PlaybackAction::Previous)],
            Action::Reconnect => {
                if self.state == ConnState::Disconnected {
                    self.state = ConnState::Connecting;
                    return vec![Op::Connect];
                }
            }
        }
        Vec::new()
    }

    fn on_enter(&mut self) -> Vec<Op> {
        let cursor = self.nav.cursor();
        match (self.nav.view, self.nav.level) {
            (View::Tracks, _) => play_from(&self.tracks, cursor),
            (View::Browser, Level::Artist) => {
                if let Some(artist) = self.index.artists().get(cursor).cloned() {
                    self.nav.open_artist(artist);
                }
                Vec::new()
            }
            (View::Browser, Level::Album) => {
                if let Some(album) = self.current_albums().get(cursor).cloned() {
                    self.nav.open_album(album);
                }
                Vec::new()
            }
            (View::Browser, Level::Track) => play_from(self.current_tracks(), cursor),
        }
    }

    fn current_albums(&self) -> &[String] {
        match &self.nav.artist {
            Some(artist) => self.index.albums(artist),
            None => &[],
        }
    }

    fn current_tracks(&self) -> &[Track] {
        match (&self.nav.artist, &self.nav.album) {
            (Some(artist), Some(album)) => self.index.tracks(artist, album),
            _ => &[],
        }
    }

    /// Length of the list currently on screen.
    pub fn list_len(&self) -> usize {
        match (self.nav.view, self.nav.level) {
            (View::Tracks, _) => self.tracks.len(),
            (View::Browser, Level::Artist) => self.index.artists().len(),
            (View::Browser, Level::Album) => self.current_albums().len(),
            (View::Browser, Level::Track) => self.current_tracks().len(),
        }
    }

    /// Row labels of the list currently on screen.
    pub fn rows(&self) -> Vec<String> {
        match (self.nav.view, self.nav.level) {
            (View::Tracks, _) => self.tracks.iter().map(list_label).collect(),
            (View::Browser, Level::Artist) => self.index.artists().to_vec(),
            (View::Browser, Level::Album) => self.current_albums().to_vec(),
            (View::Browser, Level::Track) => {
                self.current_tracks().iter().map(album_row_label).collect()
            }
        }
    }

    /// Track under the cursor, when the current list is a track list.
    pub fn selected_track(&self) -> Option<&Track> {
        let cursor = self.nav.cursor();
        match (self.nav.view, self.nav.level) {
            (View::Tracks, _) => self.tracks.get(cursor),
            (View::Browser, Level::Track) => self.current_tracks().get(cursor),
            _ => None,
        }
    }
}

fn play_from(tracks: &[Track], start: usize) -> Vec<Op> {
    if start >= tracks.len() {
        return Vec::new();
    }
    vec![Op::EnqueueAndPlay {
        uris: tracks.iter().map(|t| t.uri.clone()).collect(),
        start,
    }]
}
