// SPDX-License-Identifier: MIT
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Guess the secret four-letter code. Type `.help` in the game for commands.
#[derive(Debug, Parser)]
#[command(name = "bzguess", version)]
pub struct Args {
    /// Path to config file (default: ./bzguess.toml or <config dir>/bzguess/bzguess.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Attempts per game.
    #[arg(short = 'a', long = "attempts")]
    pub attempts: Option<u64>,

    /// Seed for the secret codes, for reproducible games.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Write the log here instead of the temp directory.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the decoded key for every key press until Ctrl+Q.
    #[arg(long = "key-debug")]
    pub key_debug: bool,
}
