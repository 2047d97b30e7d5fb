//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "ladder", version, about = "Single-pin resistor-ladder rotary encoder decoder")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/ladder.toml")]
    pub config: PathBuf,

    /// Log and print results as JSON lines instead of plain text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the encoder and print rotation and button events (Ctrl-C stops)
    Run {
        /// Stop after this many polls
        #[arg(long, value_name = "N")]
        polls: Option<u64>,
        /// Override [poll].rate_hz
        #[arg(long = "rate-hz", value_name = "HZ")]
        rate_hz: Option<u32>,
    },
    /// Decode a recorded sample trace (CSV with header `raw`)
    Replay {
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
    },
    /// Print the calibration table and any overlapping bands
    Bands,
    /// Take one sample and print its classification
    SelfCheck,
}
