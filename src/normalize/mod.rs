//! Preset normalizer
//!
//! Brings a stored or hand-edited preset into the shape the renderer and the
//! editor expect, reporting every field it had to change.

use serde::Serialize;
use tracing::debug;

use crate::domain::model::{EncoderType, FFmpegPreset};
use crate::registry;

/// Normalized preset plus a human readable note per change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPreset {
    pub preset: FFmpegPreset,
    pub warnings: Vec<String>,
}

/// Normalize a preset. Running it on its own output changes nothing.
pub fn normalize_preset(input: &FFmpegPreset) -> NormalizedPreset {
    let mut preset = input.clone();
    let mut warnings = Vec::new();
    let video = &mut preset.video;

    if video.pass == Some(1) {
        video.pass = Some(2);
        warnings.push("video.pass 1 normalized to 2; two-pass encoding always runs both passes".to_string());
    }

    if video.encoder.is_copy() {
        if video.rate_control.is_some() || video.quality_value.is_some() || video.preset.is_some() {
            warnings.push("stream copy ignores rate control, quality and preset; cleared".to_string());
        }
        video.rate_control = None;
        video.quality_value = None;
        video.preset = None;
    } else if let Some(cap) = registry::capability(&video.encoder) {
        if video.rate_control.is_none() {
            video.rate_control = Some(cap.default_rate_control);
            warnings.push(format!(
                "video.rateControl missing; defaulted to {} for {}",
                cap.default_rate_control, cap.id
            ));
        }
        if video.quality_value.is_none() {
            video.quality_value = Some(cap.default_quality);
            warnings.push(format!(
                "video.qualityValue missing; defaulted to {} for {}",
                cap.default_quality, cap.id
            ));
        }
        if video.preset.as_deref().map_or(true, str::is_empty) {
            video.preset = Some(cap.default_preset.to_string());
            warnings.push(format!(
                "video.preset missing; defaulted to {} for {}",
                cap.default_preset, cap.id
            ));
        }
    } else if let EncoderType::Unknown(id) = &video.encoder {
        warnings.push(format!("unknown video encoder {id}; fields left unchanged"));
    }

    if !warnings.is_empty() {
        debug!(id = %preset.id, warnings = warnings.len(), "preset normalized");
    }
    NormalizedPreset { preset, warnings }
}
