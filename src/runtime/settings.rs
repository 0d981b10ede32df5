use std::path::Path;

use crate::config::{self, Overrides};

/// Load settings, apply command-line overrides, and fall back to defaults on
/// any config problem.
pub fn load_settings(path: Option<&Path>, overrides: &Overrides) -> config::Settings {
    let mut settings = match config::Settings::load(path) {
        Ok(s) => s,
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("allegro: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    };
    overrides.apply(&mut settings);

    if let Err(msg) = settings.validate() {
        eprintln!("allegro: invalid config, using defaults: {msg}");
        let mut fallback = config::Settings::default();
        overrides.apply(&mut fallback);
        return fallback;
    }
    settings
}
