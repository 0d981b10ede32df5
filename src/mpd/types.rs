use std::collections::HashMap;
use std::time::Duration;

/// Player state as reported by `status`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayState {
    Play,
    Pause,
    Stop,
    #[default]
    Unknown,
}

impl PlayState {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "stop" => Self::Stop,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "playing",
            Self::Pause => "paused",
            Self::Stop => "stopped",
            Self::Unknown => "unknown",
        }
    }
}

/// Parsed `status` block.
#[derive(Debug, Clone, Default)]
pub struct Status {
    pub state: PlayState,
    pub elapsed: Duration,
    pub duration: Duration,
    /// Every `key: value` pair, keys lowercased.
    pub fields: HashMap<String, String>,
}

/// Metadata of the current song (`currentsong`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// Snapshot of what the server is playing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub elapsed: Duration,
    pub duration: Duration,
    pub playing: bool,
    pub state: PlayState,
}

impl NowPlaying {
    pub fn from_status(status: &Status) -> Self {
        Self {
            elapsed: status.elapsed,
            duration: status.duration,
            playing: status.state == PlayState::Play,
            state: status.state,
            ..Self::default()
        }
    }

    pub fn merge_song(&mut self, song: SongInfo) {
        self.title = song.title;
        self.artist = song.artist;
        self.album = song.album;
    }

    /// Local approximation between two status refreshes.
    pub fn advance(&mut self, by: Duration) {
        if !self.playing {
            return;
        }
        self.elapsed += by;
        if !self.duration.is_zero() && self.elapsed > self.duration {
            self.elapsed = self.duration;
        }
    }
}

/// One audio output, as listed by `outputs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub id: u32,
    pub name: String,
    pub enabled: bool,
}
