use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

/// Terminal client for MPD
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// MPD host (env MPD_HOST)
    #[arg(long, global = true, value_name = "HOST")]
    pub host: Option<String>,

    /// MPD port (env MPD_PORT)
    #[arg(long, global = true, value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Connect and per-command timeout in milliseconds
    #[arg(long = "timeout", global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Path to the TOML config file
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse the library and control playback (default)
    Tui,
    /// Run connectivity and readiness checks
    Doctor {
        /// Also run an idle/noidle round trip
        #[arg(long)]
        deep: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            timeout_ms: self.timeout_ms,
        }
    }
}
