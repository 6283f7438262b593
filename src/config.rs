//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "roundtimer")]
#[command(about = "Terminal client for a shared multi-segment interval timer")]
#[command(version = "0.3.0")]
pub struct Config {
    /// Base URL of the timer API
    #[arg(long, default_value = "https://timer.itsblue.de/api")]
    pub api_url: String,

    /// Seconds between timer definition refreshes in watch mode
    #[arg(short, long, default_value = "15")]
    pub refresh: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Follow a timer and render it once per second
    Watch {
        /// Timer id
        id: String,
    },

    /// Print a single status line and exit
    Status {
        /// Timer id
        id: String,
    },

    /// Pause a timer without losing its position
    Stop {
        /// Timer id
        id: String,

        /// Timer password
        #[arg(short, long)]
        password: String,
    },

    /// Continue a paused timer where it was stopped
    Resume {
        /// Timer id
        id: String,

        /// Timer password
        #[arg(short, long)]
        password: String,
    },

    /// Reset a timer to the beginning of its cycle
    Restart {
        /// Timer id
        id: String,

        /// Timer password
        #[arg(short, long)]
        password: String,
    },

    /// Create a new timer from a segments file
    Create {
        /// Timer id
        id: String,

        /// Timer password
        #[arg(short, long)]
        password: String,

        /// Path to a JSON file holding the segment list
        #[arg(short, long)]
        file: PathBuf,

        /// Cycle through the segments forever instead of running once
        #[arg(long)]
        repeat: bool,
    },
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
