use clap::Parser;

mod app;
mod cli;
mod config;
mod dispatch;
mod doctor;
mod library;
mod mpd;
mod runtime;
mod ui;

use cli::{Args, Command};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = runtime::load_settings(args.config.as_deref(), &args.overrides());

    match args.command.unwrap_or(Command::Tui) {
        Command::Tui => runtime::run_tui(settings),
        Command::Doctor { deep, json } => {
            let code = runtime::run_doctor(settings, deep, json)?;
            if code != doctor::EXIT_OK {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}
