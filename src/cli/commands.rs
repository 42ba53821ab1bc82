//! Command implementations

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::args::{AnalyzeArgs, PresetArgs, ValidateArgs};
use crate::cli::Commands;
use crate::config::AppConfig;
use crate::domain::model::FFmpegPreset;
use crate::import::{analyze, build_custom_preset};
use crate::normalize::normalize_preset;
use crate::registry;
use crate::render::render_command;
use crate::validate::{apply_all_fixes, apply_fix, has_blocking_errors, validate_preset, ValidationReport};

/// Run one subcommand, writing its result to `out`
pub fn execute(command: Commands, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Analyze(args) => analyze_command(args, config, out),
        Commands::Custom(args) => custom(args, config, out),
        Commands::Normalize(args) => normalize(args, config, out),
        Commands::Validate(args) => validate(args, config, out),
        Commands::Render(args) => render(args, out),
        Commands::Encoders => encoders(config, out),
    }
}

/// Execute the analyze command
pub fn analyze_command(args: AnalyzeArgs, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let command = read_command(&args)?;
    let analysis = analyze(&command);
    info!(
        editable = analysis.eligibility.editable,
        custom = analysis.eligibility.custom,
        "analysis finished"
    );
    write_json(out, &analysis, config)
}

/// Execute the custom command
pub fn custom(args: AnalyzeArgs, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let command = read_command(&args)?;
    let analysis = analyze(&command);
    let preset =
        build_custom_preset(&analysis).context("Command cannot be stored as a custom preset")?;
    info!(id = %preset.id, "custom preset built");
    write_json(out, &preset, config)
}

/// Execute the normalize command
pub fn normalize(args: PresetArgs, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let preset = read_preset(&args.preset)?;
    let normalized = normalize_preset(&preset);
    for warning in &normalized.warnings {
        warn!("{}", warning);
    }
    write_json(out, &normalized, config)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput {
    report: ValidationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_preset: Option<FFmpegPreset>,
    applied_fixes: usize,
}

/// Execute the validate command
pub fn validate(args: ValidateArgs, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let mut preset = read_preset(&args.preset)?;
    let initial = validate_preset(&preset);

    let applied = if args.fix_all {
        apply_all_fixes(&mut preset)
    } else {
        for id in &args.fix {
            apply_fix(&mut preset, &initial, *id)
                .with_context(|| format!("Failed to apply fix {id}"))?;
        }
        args.fix.len()
    };

    let output = if applied > 0 || args.fix_all {
        info!(applied, "fixes applied");
        ValidateOutput {
            report: validate_preset(&preset),
            fixed_preset: Some(preset),
            applied_fixes: applied,
        }
    } else {
        ValidateOutput {
            report: initial,
            fixed_preset: None,
            applied_fixes: 0,
        }
    };

    let blocking = has_blocking_errors(&output.report);
    write_json(out, &output, config)?;
    if args.strict && blocking {
        bail!("preset has {} blocking error(s)", output.report.errors().count());
    }
    Ok(())
}

/// Execute the render command
pub fn render(args: PresetArgs, out: &mut impl Write) -> Result<()> {
    let preset = read_preset(&args.preset)?;
    writeln!(out, "{}", render_command(&preset)).context("Failed to write output")?;
    Ok(())
}

/// Execute the encoders command
pub fn encoders(config: &AppConfig, out: &mut impl Write) -> Result<()> {
    write_json(out, registry::all_capabilities(), config)
}

fn read_command(args: &AnalyzeArgs) -> Result<String> {
    match &args.file {
        Some(path) => read_source(path),
        None => Ok(args.command.join(" ")),
    }
}

fn read_preset(path: &Path) -> Result<FFmpegPreset> {
    let content = read_source(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse preset {}", path.display()))
}

/// Read a file, or stdin for "-"
fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T, config: &AppConfig) -> Result<()> {
    let json = if config.output.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    writeln!(out, "{json}").context("Failed to write output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const COMMAND: &str = "ffmpeg -i INPUT -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy OUTPUT";

    fn run(command: Commands) -> Result<String> {
        let mut out = Vec::new();
        execute(command, &AppConfig::default(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn analyze_args(command: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            command: vec![command.to_string()],
            file: None,
        }
    }

    #[test]
    fn test_analyze_outputs_json() {
        let output = run(Commands::Analyze(analyze_args(COMMAND))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["eligibility"]["editable"], true);
    }

    #[test]
    fn test_custom_rejects_ineligible_command() {
        let err = run(Commands::Custom(analyze_args("ffmpeg -i a.mp4 -i b.mp4 out.mp4"))).unwrap_err();
        assert!(err.to_string().contains("custom preset"));
        assert!(matches!(
            err.downcast_ref::<crate::error::PresetError>(),
            Some(crate::error::PresetError::ImportFailed { reasons }) if reasons.len() == 1
        ));
    }

    #[test]
    fn test_validate_fix_all_and_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.json");
        let mut preset = analyze(COMMAND).structured_preset.unwrap();
        preset.audio.bitrate = Some(0);
        preset.audio.codec = crate::domain::model::AudioCodecType::Aac;
        fs::write(&path, serde_json::to_string(&preset).unwrap()).unwrap();

        let output = run(Commands::Validate(ValidateArgs {
            preset: path.clone(),
            fix: Vec::new(),
            fix_all: true,
            strict: true,
        }))
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["appliedFixes"], 1);
        assert!(value["fixedPreset"]["audio"]["bitrate"].is_null());

        let rendered = run(Commands::Render(PresetArgs { preset: path })).unwrap();
        assert!(rendered.starts_with("ffmpeg -i INPUT"));
    }

    #[test]
    fn test_missing_preset_file() {
        let err = run(Commands::Render(PresetArgs {
            preset: PathBuf::from("/nonexistent/preset.json"),
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
