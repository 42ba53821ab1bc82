//! Validation rules, run in order by `validate_preset`

use super::{FieldTag, Finding, FixKind, IssueGroup, ReportBuilder};
use crate::domain::model::{AudioCodecType, EncoderType, FFmpegPreset};
use crate::registry;
use crate::utils::time::{is_signed_time_expression, is_time_expression};

type Rule = fn(&FFmpegPreset, &mut ReportBuilder);

pub(super) const RULES: [Rule; 9] = [
    advanced_template,
    timeline_expressions,
    stream_loop,
    mapping_indices,
    metadata_and_dispositions,
    encoder_capabilities,
    bitrate_limits,
    aac_fields,
    filter_combinations,
];

/// Disposition values ffmpeg uses as stream selectors on their own
const STREAM_TYPE_SPECIFIERS: &[&str] = &["v", "a", "s", "d"];

fn advanced_template(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let empty = preset
        .ffmpeg_template
        .as_deref()
        .map_or(true, |t| t.trim().is_empty());
    if preset.advanced_enabled.unwrap_or(false) && empty {
        report.push(
            Finding::warning(IssueGroup::General, "ffmpegTemplate", "validation.advanced.emptyTemplate")
                .with_fix("fix.advanced.disable", FixKind::DisableAdvanced),
        );
    }
}

fn timeline_expressions(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let Some(input) = &preset.input else {
        return;
    };
    let checks = [
        (FieldTag::SeekPosition, input.seek_position.as_deref(), false),
        (FieldTag::Duration, input.duration.as_deref(), false),
        (FieldTag::InputTimeOffset, input.input_time_offset.as_deref(), true),
    ];
    for (field, value, signed) in checks {
        let Some(value) = value else {
            continue;
        };
        let valid = if signed {
            is_signed_time_expression(value)
        } else {
            is_time_expression(value)
        };
        if !valid {
            report.push(
                Finding::error(IssueGroup::Input, field.path(), "validation.input.invalidTimeExpression")
                    .param("value", value)
                    .with_fix("fix.clearField", FixKind::ClearField { field }),
            );
        }
    }
}

fn stream_loop(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let Some(count) = preset.input.as_ref().and_then(|i| i.stream_loop) else {
        return;
    };
    let path = FieldTag::StreamLoop.path();
    if count < -1.0 {
        report.push(
            Finding::error(IssueGroup::Input, path, "validation.input.streamLoopBelowMinusOne")
                .param("value", count)
                .with_fix(
                    "fix.clearField",
                    FixKind::ClearField {
                        field: FieldTag::StreamLoop,
                    },
                ),
        );
    } else if count.fract() != 0.0 {
        report.push(
            Finding::error(IssueGroup::Input, path, "validation.input.streamLoopNotInteger")
                .param("value", count)
                .with_fix("fix.input.truncateStreamLoop", FixKind::TruncateStreamLoop),
        );
    }
}

fn mapping_indices(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let Some(mapping) = &preset.mapping else {
        return;
    };
    let indices = [
        (FieldTag::MapMetadataIndex, mapping.map_metadata_from_input_file_index),
        (FieldTag::MapChaptersIndex, mapping.map_chapters_from_input_file_index),
    ];
    for (field, index) in indices {
        if let Some(index) = index.filter(|i| *i < -1) {
            report.push(
                Finding::error(IssueGroup::Mapping, field.path(), "validation.mapping.indexBelowMinusOne")
                    .param("value", index)
                    .with_fix("fix.mapping.resetToAuto", FixKind::ClearField { field }),
            );
        }
    }
}

/// A disposition entry naming a stream but no disposition
pub(super) fn is_specifier_only(entry: &str) -> bool {
    let entry = entry.trim();
    !entry.is_empty()
        && !entry.contains(char::is_whitespace)
        && (entry.contains(':') || STREAM_TYPE_SPECIFIERS.contains(&entry))
}

fn metadata_and_dispositions(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let Some(mapping) = &preset.mapping else {
        return;
    };
    for (index, entry) in mapping.metadata.iter().enumerate() {
        let field = format!("mapping.metadata[{index}]");
        match entry.find('=') {
            None => report.push(
                Finding::error(IssueGroup::Mapping, &field, "validation.mapping.metadataMissingSeparator")
                    .param("value", entry)
                    .with_fix(
                        "fix.mapping.appendSeparator",
                        FixKind::AppendMetadataSeparator { index },
                    ),
            ),
            Some(0) => report.push(
                Finding::error(IssueGroup::Mapping, &field, "validation.mapping.metadataEmptyKey")
                    .param("value", entry),
            ),
            Some(_) => {}
        }
    }
    for (index, entry) in mapping.dispositions.iter().enumerate() {
        if is_specifier_only(entry) {
            report.push(
                Finding::error(
                    IssueGroup::Mapping,
                    &format!("mapping.dispositions[{index}]"),
                    "validation.mapping.dispositionMissingValue",
                )
                .param("value", entry)
                .with_fix(
                    "fix.mapping.appendDefaultDisposition",
                    FixKind::AppendDispositionDefault { index },
                ),
            );
        }
    }
}

fn encoder_capabilities(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let video = &preset.video;
    if video.encoder.is_copy() {
        return;
    }
    let Some(cap) = registry::capability(&video.encoder) else {
        if let EncoderType::Unknown(id) = &video.encoder {
            report.push(
                Finding::warning(IssueGroup::Video, "video.encoder", "validation.video.unknownEncoder")
                    .param("encoder", id),
            );
        }
        return;
    };

    if let Some(mode) = video.rate_control.filter(|m| !cap.supports(*m)) {
        report.push(
            Finding::error(IssueGroup::Video, "video.rateControl", "validation.video.unsupportedRateControl")
                .param("encoder", cap.id)
                .param("mode", mode)
                .param(
                    "supported",
                    registry::rate_control_modes(&video.encoder)
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                )
                .with_fix(
                    "fix.video.defaultRateControl",
                    FixKind::SetRateControl {
                        mode: cap.default_rate_control,
                    },
                ),
        );
    }

    let constant_quality = video.rate_control.map_or(true, |m| m.is_constant_quality());
    if let Some(quality) = video.quality_value.filter(|_| constant_quality) {
        if !cap.quality_range().contains(&quality) {
            report.push(
                Finding::error(IssueGroup::Video, "video.qualityValue", "validation.video.qualityOutOfRange")
                    .param("value", quality)
                    .param("min", cap.quality_min)
                    .param("max", cap.quality_max)
                    .with_fix(
                        "fix.video.clampQuality",
                        FixKind::ClampQuality {
                            value: cap.clamp_quality(quality),
                        },
                    ),
            );
        }
    }

    if let Some(speed) = video.preset.as_deref().filter(|p| !cap.accepts_preset(p)) {
        report.push(
            Finding::warning(IssueGroup::Video, "video.preset", "validation.video.unknownPreset")
                .param("encoder", cap.id)
                .param("preset", speed)
                .with_fix(
                    "fix.video.defaultPreset",
                    FixKind::SetPreset {
                        preset: cap.default_preset.to_string(),
                    },
                ),
        );
    }
}

fn bitrate_limits(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let video = &preset.video;
    if video.encoder.is_copy() || !video.rate_control.is_some_and(|m| m.is_bitrate()) {
        return;
    }

    if let (Some(target), Some(maxrate)) = (video.bitrate_kbps, video.max_bitrate_kbps) {
        if maxrate < target {
            report.push(
                Finding::error(IssueGroup::Video, "video.maxBitrateKbps", "validation.video.maxrateBelowBitrate")
                    .param("maxrate", maxrate)
                    .param("bitrate", target)
                    .with_fix(
                        "fix.video.raiseMaxrate",
                        FixKind::RaiseMaxrate { target_kbps: target },
                    ),
            );
        }
    }

    if let (Some(maxrate), Some(bufsize)) = (video.max_bitrate_kbps, video.buffer_size_kbits) {
        let upper = maxrate.saturating_mul(3);
        if maxrate > 0 && !(maxrate..=upper).contains(&bufsize) {
            report.push(
                Finding::warning(IssueGroup::Video, "video.bufferSizeKbits", "validation.video.bufsizeOutOfRange")
                    .param("bufsize", bufsize)
                    .param("min", maxrate)
                    .param("max", upper)
                    .with_fix(
                        "fix.video.setBufsize",
                        FixKind::SetBufsize {
                            kbits: maxrate.saturating_mul(2),
                        },
                    ),
            );
        }
    }
}

fn aac_fields(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let audio = &preset.audio;
    if audio.codec != AudioCodecType::Aac {
        return;
    }
    let checks = [
        (FieldTag::AudioBitrate, audio.bitrate.map(i64::from)),
        (FieldTag::AudioSampleRate, audio.sample_rate_hz.map(i64::from)),
        (FieldTag::AudioChannels, audio.channels.map(i64::from)),
    ];
    for (field, value) in checks {
        if let Some(value) = value.filter(|v| *v <= 0) {
            report.push(
                Finding::error(IssueGroup::Audio, field.path(), "validation.audio.notPositive")
                    .param("value", value)
                    .with_fix("fix.clearField", FixKind::ClearField { field }),
            );
        }
    }
}

fn filter_combinations(preset: &FFmpegPreset, report: &mut ReportBuilder) {
    let complex = preset
        .filters
        .filter_complex
        .as_deref()
        .is_some_and(|f| !f.trim().is_empty());
    if complex && (preset.filters.has_simple_video_filters() || preset.audio.has_loudness_filter()) {
        report.push(Finding::warning(
            IssueGroup::Filters,
            "filters.filterComplex",
            "validation.filters.complexWithSimpleFilters",
        ));
    }
}
