//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the analyze and custom commands
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Command line words; joined with single spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required_unless_present = "file")]
    pub command: Vec<String>,

    /// Read the command line from a file ("-" for stdin)
    #[arg(short, long, conflicts_with = "command")]
    pub file: Option<PathBuf>,
}

/// Arguments for commands that take a preset document
#[derive(Args, Debug)]
pub struct PresetArgs {
    /// Preset JSON file ("-" for stdin)
    pub preset: PathBuf,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Preset JSON file ("-" for stdin)
    pub preset: PathBuf,

    /// Apply the fix with this id and print the fixed preset
    #[arg(long = "fix", value_name = "ID", conflicts_with = "fix_all")]
    pub fix: Vec<usize>,

    /// Apply every offered fix until none remain
    #[arg(long)]
    pub fix_all: bool,

    /// Exit with an error when blocking errors remain
    #[arg(long)]
    pub strict: bool,
}
