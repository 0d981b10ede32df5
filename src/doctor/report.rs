use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::config::MpdSettings;

pub const EXIT_OK: i32 = 0;
pub const EXIT_NO_CONNECT: i32 = 2;
pub const EXIT_GREETING: i32 = 3;
pub const EXIT_CMD_FAILED: i32 = 4;
pub const EXIT_DEEP_FAILED: i32 = 5;
pub const EXIT_AUTH_FAILED: i32 = 6;
pub const EXIT_INTERNAL: i32 = 9;

/// Outcome of one diagnostic step.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub ok: bool,
    pub warning: bool,
    pub duration_ms: u64,
    pub message: String,
}

impl Check {
    pub fn pass(name: &'static str, took: Duration, message: impl Into<String>) -> Self {
        Self {
            name,
            ok: true,
            warning: false,
            duration_ms: took.as_millis() as u64,
            message: message.into(),
        }
    }

    pub fn warn_if(mut self, warning: bool) -> Self {
        self.warning = warning;
        self
    }

    pub fn fail(name: &'static str, took: Duration, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            ..Self::pass(name, took, message)
        }
    }

    fn tag(&self) -> &'static str {
        match (self.ok, self.warning) {
            (false, _) => "FAIL",
            (true, true) => "WARN",
            (true, false) => " OK ",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
    pub mpd_version: String,
    pub checks: Vec<Check>,
    pub result: String,
    pub exit_code: i32,
}

impl Report {
    /// An unfinished report: failed with an internal error until a step
    /// decides otherwise.
    pub fn new(settings: &MpdSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            timeout_ms: settings.timeout_ms,
            mpd_version: String::new(),
            checks: Vec::new(),
            result: "FAIL".to_string(),
            exit_code: EXIT_INTERNAL,
        }
    }

    pub fn push(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// Record a failed step and stop.
    pub fn fail(mut self, check: Check, step: &str, exit_code: i32) -> Self {
        self.checks.push(check);
        self.result = format!("FAIL({step})");
        self.exit_code = exit_code;
        self
    }

    pub fn pass(mut self) -> Self {
        self.result = "PASS".to_string();
        self.exit_code = EXIT_OK;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "allegro doctor: {}:{} (timeout {}ms)",
            self.host, self.port, self.timeout_ms
        );
        if !self.mpd_version.is_empty() {
            let _ = writeln!(out, "server: MPD {}", self.mpd_version);
        }
        let width = self.checks.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for check in &self.checks {
            let _ = writeln!(
                out,
                "  [{}] {:<width$}  {:>5}ms  {}",
                check.tag(),
                check.name,
                check.duration_ms,
                check.message,
            );
        }
        let _ = write!(out, "result: {} (exit {})", self.result, self.exit_code);
        out
    }
}
