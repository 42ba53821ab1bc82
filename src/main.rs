//! ffpreset
//!
//! Command-line front end for the ffmpeg command import and preset engine.
//!
//! # Usage
//!
//! ```bash
//! ffpreset analyze 'ffmpeg -i INPUT -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy OUTPUT'
//! ffpreset validate preset.json --fix-all
//! ffpreset render preset.json
//! ffpreset encoders --pretty
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ffpreset::cli::{commands, Cli};
use ffpreset::config::AppConfig;
use ffpreset::utils::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    info!(command = ?cli.command, "starting ffpreset");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(cli.command, &config, &mut out)
}
