//! Root CLI parser and global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Interactive flame-test chemistry simulator.
///
/// Global options apply to every subcommand.
#[derive(Parser, Debug)]
#[command(name = "flamelab")]
#[command(about = "Dip virtual fingers in metal salts and watch them burn")]
#[command(version)]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "FLAMELAB_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
