//! Command import entry point
//!
//! `analyze` runs the whole pipeline on a pasted command line: lexing,
//! placeholder substitution, structured parsing and the round-trip check. The
//! result says whether the command can become an editable structured preset,
//! only an opaque custom preset, or neither.

pub mod fallback;
pub mod verifier;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::{join_tokens, lex, normalize_placeholders};
use crate::domain::model::FFmpegPreset;
use crate::error::ImportError;
use crate::parser::parse_structured;

pub use fallback::build_custom_preset;
pub use verifier::{comparable_form, verify_round_trip};

/// What the UI may do with an analyzed command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    /// A structured preset reproduces the command exactly
    pub editable: bool,
    /// The command can be stored as a placeholder template
    pub custom: bool,
}

/// Result of analyzing one command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAnalysis {
    pub trimmed: String,
    /// Full command with placeholders; the trimmed input when they did not resolve
    pub normalized_template: String,
    /// Arguments only, with placeholders
    pub args_only_template: Option<String>,
    pub eligibility: Eligibility,
    /// Human readable reasons the command is not editable
    pub reasons: Vec<String>,
    pub suggested_name: String,
    pub structured_preset: Option<FFmpegPreset>,
}

impl CommandAnalysis {
    fn rejected(trimmed: &str, reasons: &[ImportError]) -> Self {
        Self {
            trimmed: trimmed.to_string(),
            normalized_template: trimmed.to_string(),
            args_only_template: None,
            eligibility: Eligibility::default(),
            reasons: reasons.iter().map(ToString::to_string).collect(),
            suggested_name: CUSTOM_NAME.to_string(),
            structured_preset: None,
        }
    }

    /// Stable id derived from the trimmed command
    pub fn preset_id(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.trimmed.hash(&mut hasher);
        format!("imported-{:08x}", hasher.finish() as u32)
    }
}

const CUSTOM_NAME: &str = "Imported custom command";

fn suggested_name(preset: &FFmpegPreset) -> String {
    let video = &preset.video;
    let detail = match (video.rate_control, video.quality_value, video.bitrate_kbps) {
        (Some(mode), Some(quality), _) if mode.is_constant_quality() => format!(" / {mode} {quality}"),
        (Some(mode), _, Some(bitrate)) if mode.is_bitrate() => format!(" / {mode} {bitrate}k"),
        _ => String::new(),
    };
    format!("Imported: {}{detail}", video.encoder)
}

/// Analyze a pasted command line
pub fn analyze(raw: &str) -> CommandAnalysis {
    let trimmed = raw.trim();
    let normalized = match normalize_placeholders(lex(trimmed)) {
        Ok(normalized) => normalized,
        Err(reasons) => {
            info!(reasons = reasons.len(), "command rejected before parsing");
            return CommandAnalysis::rejected(trimmed, &reasons);
        }
    };

    let mut analysis = CommandAnalysis {
        trimmed: trimmed.to_string(),
        normalized_template: join_tokens(&normalized.tokens),
        args_only_template: Some(join_tokens(&normalized.args)),
        eligibility: Eligibility {
            editable: false,
            custom: true,
        },
        reasons: Vec::new(),
        suggested_name: CUSTOM_NAME.to_string(),
        structured_preset: None,
    };

    let parsed = parse_structured(&normalized.tokens).and_then(|preset| {
        verify_round_trip(&normalized.tokens, &preset)
            .map(|()| preset)
            .map_err(|reason| vec![reason])
    });

    match parsed {
        Ok(mut preset) => {
            preset.id = analysis.preset_id();
            preset.name = suggested_name(&preset);
            analysis.suggested_name = preset.name.clone();
            analysis.eligibility.editable = true;
            debug!(id = %preset.id, "command imported as structured preset");
            analysis.structured_preset = Some(preset);
        }
        Err(reasons) => {
            debug!(reasons = reasons.len(), "command kept as custom template only");
            analysis.reasons = reasons.iter().map(ToString::to_string).collect();
        }
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_not_eligible() {
        let analysis = analyze("   ");
        assert_eq!(analysis.eligibility, Eligibility::default());
        assert_eq!(analysis.reasons, vec!["empty command"]);
        assert!(analysis.args_only_template.is_none());
    }

    #[test]
    fn test_structured_import_gets_id_and_name() {
        let analysis = analyze("ffmpeg -i a.mp4 -map 0 -c:v libx264 -crf 20 -preset slow -c:a copy b.mp4");
        assert!(analysis.eligibility.editable);
        let preset = analysis.structured_preset.as_ref().unwrap();
        assert!(preset.id.starts_with("imported-"));
        assert_eq!(preset.id, analysis.preset_id());
        assert_eq!(preset.name, "Imported: libx264 / crf 20");
        assert_eq!(analysis.suggested_name, preset.name);
    }

    #[test]
    fn test_non_canonical_order_is_custom_only() {
        let analysis = analyze("ffmpeg -i a.mp4 -c:v libx264 -map 0 -crf 20 -preset slow -c:a copy b.mp4");
        assert_eq!(
            analysis.eligibility,
            Eligibility {
                editable: false,
                custom: true
            }
        );
        assert_eq!(
            analysis.reasons,
            vec![ImportError::RoundTripMismatch.to_string()]
        );
    }

    #[test]
    fn test_templates_use_placeholders() {
        let analysis = analyze("  -i a.mp4 -c:v copy -x264-params a=b b.mp4 ");
        assert_eq!(analysis.trimmed, "-i a.mp4 -c:v copy -x264-params a=b b.mp4");
        assert_eq!(
            analysis.normalized_template,
            "ffmpeg -i INPUT -c:v copy -x264-params a=b OUTPUT"
        );
        assert_eq!(
            analysis.args_only_template.as_deref(),
            Some("-i INPUT -c:v copy -x264-params a=b OUTPUT")
        );
        assert_eq!(analysis.reasons, vec!["unsupported parameter: -x264-params"]);
    }
}
