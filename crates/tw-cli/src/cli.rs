//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Toolwindow session analytics.
///
/// Reconstructs bounded sessions from raw opened/closed event streams and
/// statistically compares manual vs auto session durations.
#[derive(Debug, Parser)]
#[command(name = "tw", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full matching + comparison pipeline and print a report.
    Analyze {
        /// Path to the raw event CSV (user_id,timestamp,event,open_type).
        #[arg(long)]
        input: PathBuf,

        /// Write the kept-session table to this CSV file.
        #[arg(long)]
        sessions_out: Option<PathBuf>,

        /// Emit the report as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,

        /// Outlier ceiling in minutes (overrides config).
        #[arg(long)]
        ceiling: Option<f64>,

        /// Bootstrap resample count (overrides config).
        #[arg(long)]
        iterations: Option<usize>,

        /// Bootstrap seed (overrides config).
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Reconstruct and filter sessions without running the comparison.
    Sessions {
        /// Path to the raw event CSV (user_id,timestamp,event,open_type).
        #[arg(long)]
        input: PathBuf,

        /// Write the kept-session table to this CSV file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Outlier ceiling in minutes (overrides config).
        #[arg(long)]
        ceiling: Option<f64>,
    },
}
