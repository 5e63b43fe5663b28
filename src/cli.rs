//! CLI definitions for Racketeer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use racketeer_protocols::{ActionKind, TrainingStat};

/// Racketeer CLI.
#[derive(Parser)]
#[command(name = "racketeer")]
#[command(about = "Throttled automation agent for the Mobsteria browser game")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the automation loops until Ctrl-C (default)
    Run {
        /// Start the bust scanner (needs a browser with remote debugging)
        #[arg(long)]
        bust: bool,

        /// Start the auto-trainer
        #[arg(long)]
        trainer: bool,

        /// Start the auto-crime loop
        #[arg(long)]
        crimes: bool,
    },

    /// Validate the configuration file
    Check,

    /// Fetch the character once and print it as JSON
    Fetch,

    /// Train a stat once
    Train {
        /// health, stamina, strength, speed, endurance or defence
        stat: Option<TrainingStat>,
    },

    /// Attempt one crime, GTA or heist
    Act {
        /// crime, gta or heist
        kind: ActionKind,

        /// Action id; the configured id is used when omitted
        #[arg(long)]
        id: Option<u64>,
    },
}
