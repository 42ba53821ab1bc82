//! Fix application

use tracing::debug;

use super::rules::is_specifier_only;
use super::{validate_preset, FieldTag, FixKind, ValidationReport};
use crate::domain::model::FFmpegPreset;
use crate::error::{PresetError, PresetResult};
use crate::registry;

/// Rounds `apply_all_fixes` runs before giving up on convergence
const MAX_FIX_ROUNDS: usize = 4;

impl FixKind {
    /// Mutate the preset so the condition that produced this fix is gone
    pub fn apply(&self, preset: &mut FFmpegPreset) {
        match self {
            FixKind::DisableAdvanced => preset.advanced_enabled = Some(false),
            FixKind::ClearField { field } => clear_field(preset, *field),
            FixKind::TruncateStreamLoop => {
                if let Some(input) = preset.input.as_mut() {
                    input.stream_loop = input.stream_loop.map(f64::trunc);
                }
            }
            FixKind::AppendMetadataSeparator { index } => {
                let entry = preset
                    .mapping
                    .as_mut()
                    .and_then(|m| m.metadata.get_mut(*index));
                if let Some(entry) = entry.filter(|e| !e.contains('=')) {
                    entry.push('=');
                }
            }
            FixKind::AppendDispositionDefault { index } => {
                let entry = preset
                    .mapping
                    .as_mut()
                    .and_then(|m| m.dispositions.get_mut(*index));
                if let Some(entry) = entry.filter(|e| is_specifier_only(e)) {
                    *entry = format!("{} default", entry.trim());
                }
            }
            FixKind::RaiseMaxrate { target_kbps } => {
                let video = &mut preset.video;
                video.max_bitrate_kbps = Some(video.max_bitrate_kbps.map_or(*target_kbps, |m| m.max(*target_kbps)));
            }
            FixKind::SetBufsize { kbits } => preset.video.buffer_size_kbits = Some(*kbits),
            FixKind::SetRateControl { mode } => {
                preset.video = registry::apply_rate_control_change(&preset.video, *mode);
            }
            FixKind::ClampQuality { value } => preset.video.quality_value = Some(*value),
            FixKind::SetPreset { preset: speed } => preset.video.preset = Some(speed.clone()),
        }
    }
}

fn clear_field(preset: &mut FFmpegPreset, field: FieldTag) {
    let input = preset.input.as_mut();
    let mapping = preset.mapping.as_mut();
    let audio = &mut preset.audio;
    match field {
        FieldTag::SeekPosition => {
            if let Some(input) = input {
                input.seek_position = None;
                input.seek_mode = None;
            }
        }
        FieldTag::Duration => {
            if let Some(input) = input {
                input.duration = None;
                input.duration_mode = None;
            }
        }
        FieldTag::InputTimeOffset => {
            if let Some(input) = input {
                input.input_time_offset = None;
            }
        }
        FieldTag::StreamLoop => {
            if let Some(input) = input {
                input.stream_loop = None;
            }
        }
        FieldTag::MapMetadataIndex => {
            if let Some(mapping) = mapping {
                mapping.map_metadata_from_input_file_index = None;
            }
        }
        FieldTag::MapChaptersIndex => {
            if let Some(mapping) = mapping {
                mapping.map_chapters_from_input_file_index = None;
            }
        }
        FieldTag::AudioBitrate => audio.bitrate = None,
        FieldTag::AudioSampleRate => audio.sample_rate_hz = None,
        FieldTag::AudioChannels => audio.channels = None,
    }
}

/// Apply one fix offered by `report`
pub fn apply_fix(preset: &mut FFmpegPreset, report: &ValidationReport, id: usize) -> PresetResult<()> {
    let fix = report.fix(id).ok_or(PresetError::UnknownFix { id })?;
    debug!(id, label = %fix.label_key, "applying fix");
    fix.kind.apply(preset);
    Ok(())
}

/// Apply every offered fix, re-validating until nothing fixable remains.
/// Returns the number of fixes applied.
pub fn apply_all_fixes(preset: &mut FFmpegPreset) -> usize {
    let mut applied = 0;
    for _ in 0..MAX_FIX_ROUNDS {
        let report = validate_preset(preset);
        if report.fixes.is_empty() {
            break;
        }
        for fix in &report.fixes {
            fix.kind.apply(preset);
            applied += 1;
        }
    }
    applied
}
