use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_ms: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.mpd.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.mpd.port = port;
        }
        if let Some(ms) = self.timeout_ms {
            settings.mpd.timeout_ms = ms;
        }
    }
}

/// Configuration loading helpers.
///
/// `Settings::load` reads the optional config file, then environment variables
/// (prefix `ALLEGRO__`), then the conventional `MPD_HOST` / `MPD_PORT`, and
/// falls back to struct defaults.
impl Settings {
    /// Load settings from an explicit path or the resolved default one.
    pub fn load(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let config_path = path.map(Path::to_path_buf).or_else(resolve_config_path);

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ALLEGRO")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder
            .set_override_option("mpd.host", env::var("MPD_HOST").ok())?
            .set_override_option("mpd.port", env::var("MPD_PORT").ok())?;

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.mpd.host.trim().is_empty() {
            return Err("mpd.host must not be empty".to_string());
        }
        if self.mpd.port == 0 {
            return Err("mpd.port must be >= 1".to_string());
        }
        if self.mpd.timeout_ms == 0 {
            return Err("mpd.timeout_ms must be >= 1".to_string());
        }
        if self.mpd.idle_timeout_ms == 0 {
            return Err("mpd.idle_timeout_ms must be >= 1".to_string());
        }
        if self.ui.tick_ms == 0 {
            return Err("ui.tick_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `ALLEGRO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ALLEGRO_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/allegro/config.toml`
/// or `~/.config/allegro/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("allegro").join("config.toml"))
}
