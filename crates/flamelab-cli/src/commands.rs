//! Subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the simulator over recorded frames or a synthetic backdrop
    Run(RunArgs),

    /// List the chemicals on the shelf
    Chemicals,

    /// Explain why a metal colours the flame
    Explain {
        /// Element symbol (Na, K, Li, Cu, Ca, Ba)
        symbol: String,
    },

    /// List the known flame mixtures
    Mixtures,

    /// Show the keyboard controls
    Controls,

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Settings file commands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings as JSON
    Show,
    /// Print the settings file location
    Path,
    /// Check the settings file for invalid values
    Validate,
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Options for `flamelab run`.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory of png/jpg frames, replayed in file-name order
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Start the frame directory over when it runs out
    #[arg(long = "loop", requires = "frames")]
    pub looping: bool,

    /// JSON Lines hand trace to replay
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Write composited frames as numbered PNG files
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    pub max_frames: Option<u64>,

    /// Frames of synthetic backdrop (default: trace length, else 300)
    #[arg(long, value_name = "N", conflicts_with = "frames")]
    pub length: Option<u64>,

    /// Use wall-clock time instead of the fixed target-FPS clock
    #[arg(long)]
    pub realtime: bool,

    /// Seed for particle effects
    #[arg(long)]
    pub seed: Option<u64>,

    /// TrueType font for overlay text
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Do not mirror frames horizontally
    #[arg(long)]
    pub no_mirror: bool,

    /// Backdrop width in pixels (default: settings)
    #[arg(long, conflicts_with = "frames")]
    pub width: Option<u32>,

    /// Backdrop height in pixels (default: settings)
    #[arg(long, conflicts_with = "frames")]
    pub height: Option<u32>,
}
