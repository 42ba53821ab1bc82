//! Custom (opaque template) preset for commands that cannot be structured

use crate::command::lexer::{lex, unquote};
use crate::domain::model::*;
use crate::error::{PresetError, PresetResult};
use crate::import::CommandAnalysis;
use crate::registry;

/// Build a custom preset from an analysis whose placeholders resolved.
///
/// The encoder, audio codec and rate control shown in preset lists are guessed
/// from well known flags; the command itself runs from the template.
pub fn build_custom_preset(analysis: &CommandAnalysis) -> PresetResult<FFmpegPreset> {
    let Some(template) = analysis
        .args_only_template
        .as_deref()
        .filter(|_| analysis.eligibility.custom)
    else {
        return Err(PresetError::ImportFailed {
            reasons: analysis.reasons.clone(),
        });
    };

    let tokens = lex(template);
    let value_of = |flag: &str| {
        tokens
            .iter()
            .position(|t| t == flag)
            .and_then(|i| tokens.get(i + 1))
            .map(|v| unquote(v))
    };

    let encoder = value_of("-c:v")
        .and_then(EncoderType::parse)
        .unwrap_or(EncoderType::Libx264);
    let mut video = VideoConfig::new(encoder.clone());
    if let Some(cap) = registry::capability(&encoder).filter(|_| !encoder.is_copy()) {
        let crf = value_of("-crf").and_then(|v| v.parse::<i32>().ok());
        let cq = value_of("-cq").and_then(|v| v.parse::<i32>().ok());
        let bitrate = value_of("-b:v").and_then(|v| v.trim_end_matches('k').parse::<i32>().ok());

        let (mode, quality) = match (crf, cq, bitrate) {
            (Some(q), _, _) => (RateControlMode::Crf, q),
            (None, Some(q), _) => (RateControlMode::Cq, q),
            (None, None, Some(_)) => (RateControlMode::Cbr, cap.default_quality),
            (None, None, None) => (cap.default_rate_control, cap.default_quality),
        };
        video.rate_control = Some(mode);
        video.quality_value = Some(quality);
        video.bitrate_kbps = bitrate.filter(|_| mode.is_bitrate());
        video.preset = Some(
            value_of("-preset")
                .unwrap_or(cap.default_preset)
                .to_string(),
        );
    }

    let codec = value_of("-c:a")
        .and_then(AudioCodecType::parse)
        .unwrap_or(AudioCodecType::Copy);

    let mut preset = FFmpegPreset::new(
        analysis.preset_id(),
        analysis.suggested_name.clone(),
        video,
        AudioConfig::new(codec),
    );
    preset.advanced_enabled = Some(true);
    preset.ffmpeg_template = Some(template.to_string());
    Ok(preset)
}
