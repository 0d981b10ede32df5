//! `allegro doctor`: a fixed sequence of connectivity and readiness checks.
//!
//! Steps run in order and the first failing step ends the run; its exit code
//! becomes the report's.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::MpdSettings;
use crate::mpd::{MpdError, MpdSession, TcpSession};

mod report;

pub use report::*;

/// Upper bound for the `--deep` idle wait; the run should stay quick.
const DEEP_IDLE_MS: u64 = 500;

async fn timed<F: Future>(fut: F) -> (F::Output, Duration) {
    let started = Instant::now();
    let out = fut.await;
    (out, started.elapsed())
}

fn command_exit_code(err: &MpdError) -> i32 {
    if err.is_permission_denied() {
        EXIT_AUTH_FAILED
    } else {
        EXIT_CMD_FAILED
    }
}

pub async fn run(settings: &MpdSettings, deep: bool) -> Report {
    let mut report = Report::new(settings);
    let addr = settings.addr();

    let mut session_settings = settings.clone();
    session_settings.idle_timeout_ms = DEEP_IDLE_MS.min(settings.timeout_ms);

    let (connected, took) = timed(TcpSession::connect(&session_settings)).await;
    let session = match connected {
        Ok(session) => session,
        Err(MpdError::Connect { reason, .. }) => {
            let check = Check::fail("tcp_connect", took, format!("connect {addr} failed: {reason}"));
            return report.fail(check, "connect", EXIT_NO_CONNECT);
        }
        Err(MpdError::Greeting(line)) => {
            report.push(Check::pass("tcp_connect", took, "connected"));
            let check = Check::fail("greeting", Duration::ZERO, format!("unexpected greeting: {line:?}"));
            return report.fail(check, "greeting", EXIT_GREETING);
        }
        Err(e) => {
            // Dial and greeting went fine; the password exchange did not.
            report.push(Check::pass("tcp_connect", took, "connected"));
            let check = Check::fail("password", took, e.to_string());
            return report.fail(check, "password", EXIT_AUTH_FAILED);
        }
    };
    report.mpd_version = session.server_version().to_string();
    report.push(Check::pass("tcp_connect", took, "connected"));
    report.push(Check::pass(
        "greeting",
        Duration::ZERO,
        format!("OK MPD {}", report.mpd_version),
    ));

    let (status, took) = timed(session.status()).await;
    match status {
        Ok(status) => {
            let state = status.fields.get("state").map_or("unknown", String::as_str);
            report.push(Check::pass("status", took, format!("state={state}")));
        }
        Err(e) => {
            let code = command_exit_code(&e);
            return report.fail(Check::fail("status", took, e.to_string()), "status", code);
        }
    }

    let (stats, took) = timed(session.stats()).await;
    match stats {
        Ok(stats) => {
            let songs = stats.get("songs").map_or("unknown", String::as_str);
            let empty = songs == "0";
            let mut message = format!("songs={songs}");
            if empty {
                message.push_str(" (library empty? run `mpc update`)");
            }
            report.push(Check::pass("stats", took, message).warn_if(empty));
        }
        Err(e) => {
            let code = command_exit_code(&e);
            return report.fail(Check::fail("stats", took, e.to_string()), "stats", code);
        }
    }

    let (outputs, took) = timed(session.outputs()).await;
    match outputs {
        Ok(outputs) => {
            let enabled = outputs.iter().filter(|o| o.enabled).count();
            let warn = outputs.is_empty() || enabled == 0;
            let mut message = format!("outputs={} enabled={enabled}", outputs.len());
            let names: Vec<&str> = outputs
                .iter()
                .filter(|o| o.enabled)
                .map(|o| o.name.as_str())
                .collect();
            if !names.is_empty() {
                message.push_str(&format!(" [{}]", names.join(", ")));
            }
            if let Some(first) = outputs.first().filter(|_| enabled == 0) {
                message.push_str(&format!(" (enable one with `mpc enable {}`)", first.id));
            }
            report.push(Check::pass("outputs", took, message).warn_if(warn));
        }
        Err(e) => {
            let code = command_exit_code(&e);
            return report.fail(Check::fail("outputs", took, e.to_string()), "outputs", code);
        }
    }

    if deep {
        let subs = ["player".to_string(), "database".to_string()];
        let (idle, took) = timed(session.wait_for_change(&subs)).await;
        match idle {
            Ok(changed) if changed.is_empty() => {
                report.push(Check::pass("idle_roundtrip", took, "idle/noidle OK"));
            }
            Ok(changed) => {
                let message = format!("idle OK (changed: {})", changed.join(", "));
                report.push(Check::pass("idle_roundtrip", took, message));
            }
            Err(e) => {
                tracing::debug!(error = %e, "deep idle check failed");
                let check = Check::fail(
                    "idle_roundtrip",
                    took,
                    format!("idle failed: {e} (try again, or skip --deep)"),
                );
                return report.fail(check, "deep", EXIT_DEEP_FAILED);
            }
        }
    }

    report.pass()
}

/// Print `report` to stdout, as JSON or as a human-readable table.
pub fn print(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render_human());
    }
    Ok(())
}
