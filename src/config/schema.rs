use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/allegro/config.toml` or `~/.config/allegro/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (`--host`, `--port`, `--timeout`)
/// 2) `MPD_HOST` / `MPD_PORT`
/// 3) Environment variables (prefix `ALLEGRO__`, `__` as nested separator)
/// 4) Config file (if present)
/// 5) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mpd: MpdSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MpdSettings {
    pub host: String,
    pub port: u16,
    /// Dial, greeting and per-command read deadline (milliseconds).
    pub timeout_ms: u64,
    /// How long a single `idle` waits before it is cancelled with `noidle`
    /// and re-issued (milliseconds).
    pub idle_timeout_ms: u64,
    /// Sent with `password` right after the greeting.
    pub password: Option<String>,
    /// Use a second connection for `idle` so regular commands never queue
    /// behind a pending long-poll.
    pub dedicated_idle_connection: bool,
}

impl Default for MpdSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6600,
            timeout_ms: 2000,
            idle_timeout_ms: 30_000,
            password: None,
            dedicated_idle_connection: true,
        }
    }
}

impl MpdSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered in the top header box.
    pub header_text: String,

    /// Interval of the local elapsed-time animation (milliseconds).
    pub tick_ms: u64,

    /// Which view is active on startup.
    pub start_view: StartView,

    /// Which time fields to show in the progress line, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ allegro ~ ".to_string(),
            tick_ms: 500,
            start_view: StartView::Tracks,
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

impl UiSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartView {
    #[serde(alias = "all", alias = "list")]
    Tracks,
    #[serde(alias = "browser", alias = "artist")]
    Artists,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Log file for the TUI. Defaults to `allegro.log` in the temp directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
