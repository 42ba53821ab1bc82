//! CLI module for ffpreset
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// ffpreset
///
/// Imports pasted ffmpeg command lines into structured presets and checks
/// that a preset renders back to the exact same command.
#[derive(Parser, Debug)]
#[command(name = "ffpreset")]
#[command(about = "Import ffmpeg command lines into round-trip safe presets")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file
    #[arg(long, global = true, env = "FFPRESET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line layer of the configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_level: self.log_level,
            log_format: self.log_format,
            pretty: self.pretty,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a command line and report how it can be imported
    Analyze(args::AnalyzeArgs),
    /// Build a custom template preset from a command line
    Custom(args::AnalyzeArgs),
    /// Normalize a preset JSON document
    Normalize(args::PresetArgs),
    /// Validate a preset JSON document, optionally applying fixes
    Validate(args::ValidateArgs),
    /// Render a preset JSON document as an ffmpeg command line
    Render(args::PresetArgs),
    /// List the encoder capability registry
    Encoders,
}
