//! Messages folded by the reducer and the operations it asks the runtime to run.

use std::fmt;
use std::time::Duration;

use crate::library::Track;
use crate::mpd::{Connection, MpdError, NowPlaying};

/// Subsystems the app keeps an `idle` open for.
pub const WATCHED_SUBSYSTEMS: [&str; 2] = ["player", "database"];

/// Completed work, or a key press, fed to [`super::App::update`].
#[derive(Debug)]
pub enum Msg {
    Connected(Connection),
    ConnectFailed(MpdError),
    LibraryLoaded(Vec<Track>),
    Status(NowPlaying),
    /// Subsystems reported by an `idle` issued on connection `generation`.
    Changed {
        subsystems: Vec<String>,
        generation: u64,
    },
    Tick,
    Failed { op: OpKind, err: MpdError },
    Input(Action),
}

/// Side effects requested by the reducer. Each resolves to exactly one [`Msg`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Connect,
    FetchLibrary,
    RefreshStatus,
    Playback(PlaybackAction),
    EnqueueAndPlay { uris: Vec<String>, start: usize },
    WaitForChange {
        subsystems: Vec<String>,
        generation: u64,
    },
    Tick(Duration),
}

impl Op {
    pub fn kind(&self) -> OpKind {
        match self {
            Op::Connect => OpKind::Connect,
            Op::FetchLibrary => OpKind::Library,
            Op::RefreshStatus => OpKind::Status,
            Op::Playback(_) => OpKind::Playback,
            Op::EnqueueAndPlay { .. } => OpKind::Enqueue,
            Op::WaitForChange { generation, .. } => OpKind::Idle(*generation),
            Op::Tick(_) => OpKind::Tick,
        }
    }

    /// Long-poll on the watched subsystems for connection `generation`.
    pub fn watch(generation: u64) -> Self {
        Op::WaitForChange {
            subsystems: WATCHED_SUBSYSTEMS.iter().map(|s| s.to_string()).collect(),
            generation,
        }
    }
}

/// Which operation a failure came from. `Idle` carries the connection
/// generation it was issued on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpKind {
    Connect,
    Library,
    Status,
    Playback,
    Enqueue,
    Idle(u64),
    Tick,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpKind::Connect => "connect",
            OpKind::Library => "library",
            OpKind::Status => "status",
            OpKind::Playback => "playback",
            OpKind::Enqueue => "enqueue",
            OpKind::Idle(_) => "idle",
            OpKind::Tick => "tick",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackAction {
    TogglePause,
    Next,
    Previous,
}

/// User intents, already decoded from key presses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Top,
    Bottom,
    Enter,
    Back,
    SwitchView,
    ToggleInfo,
    Quit,
    TogglePause,
    Next,
    Previous,
    Reconnect,
}
