// SPDX-License-Identifier: MIT
//
// bzguess — a code-breaking game played in a raw-mode terminal line.
//
// This is the main binary that wires together the crates:
//
//   bz-term   → raw mode, input channel, key table, dispatcher
//   bz-editor → line editor, modes, per-mode keymaps, command parsing
//   bz-solver → scoring, candidate reduction, minimax guesses
//
// Startup order:
//
//   args → config (file, then flags) → log file → signal handlers
//        → session (raw mode + reader thread) → game loop → farewell
//
// The session restores the terminal on drop, so every exit path after
// `start` leaves the tty as it found it.

mod app;
mod cli;
mod commands;
mod config;
mod error;
mod game;
mod logging;
mod render;

use std::io::{self, BufWriter};
use std::process;
use std::sync::Arc;

use bz_term::{Session, terminal};
use clap::Parser;
use tracing::info;

use crate::app::{App, global_keymap};
use crate::cli::Args;
use crate::error::AppError;
use crate::game::Games;

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("bzguess: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let mut config = config::load(args.config.as_deref())?;
    config.apply_args(args);
    config.validate()?;

    let log_path = config.log_path();
    if let Err(e) = logging::init(&log_path) {
        eprintln!("bzguess: logging disabled, can't create {}: {e}", log_path.display());
    }
    info!(version = env!("CARGO_PKG_VERSION"), "bzguess starting");

    terminal::install_termination_handlers();

    let mut app = App::new(
        BufWriter::new(io::stdout()),
        config.clone(),
        Games::new(config.attempts, args.seed),
    );
    let mut session = Session::new(Arc::new(global_keymap()), app.keymap(), config.poll_interval());
    session.start()?;

    let result = if args.key_debug {
        let mut out = io::stdout().lock();
        app::run_key_debug(&mut out, &mut session)
    } else {
        app::run(&mut app, &mut session)
    };
    session.stop();

    info!("bzguess exiting");
    result.map_err(AppError::from)
}
