//! Encoder capability registry
//!
//! A static, read-only table describing what every supported video encoder
//! accepts: rate-control modes, speed presets, tunes, quality range and the
//! defaults used when a preset leaves a field open. The parser, the preset
//! normalizer and the editor validator all consult this table.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::domain::model::{EncoderType, RateControlMode, VideoConfig};

use crate::domain::model::RateControlMode::{Cbr, Constqp, Cq, Crf, Vbr};

/// Capability record for one encoder
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncoderCapability {
    pub id: &'static str,
    pub label: &'static str,
    pub hardware: bool,
    pub rate_controls: &'static [RateControlMode],
    pub presets: &'static [&'static str],
    /// Encoder-specific tunes; empty when the encoder has none of its own
    pub tunes: &'static [&'static str],
    pub default_rate_control: RateControlMode,
    pub default_quality: i32,
    pub default_preset: &'static str,
    pub quality_min: i32,
    pub quality_max: i32,
    /// Flag carrying the quality value in `cq` mode
    pub cq_flag: &'static str,
}

impl EncoderCapability {
    pub fn quality_range(&self) -> RangeInclusive<i32> {
        self.quality_min..=self.quality_max
    }

    pub fn supports(&self, mode: RateControlMode) -> bool {
        self.rate_controls.contains(&mode)
    }

    pub fn accepts_preset(&self, preset: &str) -> bool {
        self.presets.contains(&preset)
    }

    pub fn clamp_quality(&self, value: i32) -> i32 {
        value.clamp(self.quality_min, self.quality_max)
    }
}

/// Presentation entry for encoder pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncoderOption {
    pub id: &'static str,
    pub label: &'static str,
    pub hardware: bool,
}

const X26X_PRESETS: &[&str] = &[
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
    "placebo",
];
const NVENC_PRESETS: &[&str] = &["p1", "p2", "p3", "p4", "p5", "p6", "p7"];
const QSV_PRESETS: &[&str] = &[
    "veryfast", "faster", "fast", "medium", "slow", "slower", "veryslow",
];
const AMF_PRESETS: &[&str] = &["speed", "balanced", "quality"];
const SVT_PRESETS: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13",
];

const X264_TUNES: &[&str] = &[
    "film",
    "animation",
    "grain",
    "stillimage",
    "fastdecode",
    "zerolatency",
    "psnr",
    "ssim",
];

const X265_TUNES: &[&str] = &[
    "psnr",
    "ssim",
    "grain",
    "zerolatency",
    "fastdecode",
    "animation",
];

const SOFTWARE_MODES: &[RateControlMode] = &[Crf, Cbr, Vbr];
const NVENC_MODES: &[RateControlMode] = &[Cq, Constqp, Cbr, Vbr];
const QSV_MODES: &[RateControlMode] = &[Cq, Cbr, Vbr];
const AMF_MODES: &[RateControlMode] = &[Cq, Cbr, Vbr];

static CAPABILITIES: [EncoderCapability; 11] = [
    EncoderCapability {
        id: "libx264",
        label: "H.264 / AVC (libx264)",
        hardware: false,
        rate_controls: SOFTWARE_MODES,
        presets: X26X_PRESETS,
        tunes: X264_TUNES,
        default_rate_control: Crf,
        default_quality: 23,
        default_preset: "medium",
        quality_min: 0,
        quality_max: 51,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "libx265",
        label: "H.265 / HEVC (libx265)",
        hardware: false,
        rate_controls: SOFTWARE_MODES,
        presets: X26X_PRESETS,
        tunes: X265_TUNES,
        default_rate_control: Crf,
        default_quality: 28,
        default_preset: "medium",
        quality_min: 0,
        quality_max: 51,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "h264_nvenc",
        label: "H.264 NVENC (NVIDIA)",
        hardware: true,
        rate_controls: NVENC_MODES,
        presets: NVENC_PRESETS,
        tunes: &[],
        default_rate_control: Cq,
        default_quality: 23,
        default_preset: "p5",
        quality_min: 0,
        quality_max: 51,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "hevc_nvenc",
        label: "H.265 / HEVC NVENC (NVIDIA)",
        hardware: true,
        rate_controls: NVENC_MODES,
        presets: NVENC_PRESETS,
        tunes: &[],
        default_rate_control: Cq,
        default_quality: 28,
        default_preset: "p5",
        quality_min: 0,
        quality_max: 51,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "av1_nvenc",
        label: "AV1 NVENC (NVIDIA)",
        hardware: true,
        rate_controls: NVENC_MODES,
        presets: NVENC_PRESETS,
        tunes: &[],
        default_rate_control: Cq,
        default_quality: 34,
        default_preset: "p5",
        quality_min: 0,
        quality_max: 51,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "hevc_qsv",
        label: "H.265 / HEVC QSV (Intel)",
        hardware: true,
        rate_controls: QSV_MODES,
        presets: QSV_PRESETS,
        tunes: &[],
        default_rate_control: Cq,
        default_quality: 24,
        default_preset: "medium",
        quality_min: 1,
        quality_max: 51,
        cq_flag: "-global_quality",
    },
    EncoderCapability {
        id: "av1_qsv",
        label: "AV1 QSV (Intel)",
        hardware: true,
        rate_controls: QSV_MODES,
        presets: QSV_PRESETS,
        tunes: &[],
        default_rate_control: Cq,
        default_quality: 30,
        default_preset: "medium",
        quality_min: 1,
        quality_max: 51,
        cq_flag: "-global_quality",
    },
    EncoderCapability {
        id: "hevc_amf",
        label: "H.265 / HEVC AMF (AMD)",
        hardware: true,
        rate_controls: AMF_MODES,
        presets: AMF_PRESETS,
        tunes: &[],
        default_rate_control: Cq,
        default_quality: 28,
        default_preset: "balanced",
        quality_min: 0,
        quality_max: 51,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "av1_amf",
        label: "AV1 AMF (AMD)",
        hardware: true,
        rate_controls: AMF_MODES,
        presets: AMF_PRESETS,
        tunes: &[],
        default_rate_control: Cq,
        default_quality: 32,
        default_preset: "balanced",
        quality_min: 0,
        quality_max: 51,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "libsvtav1",
        label: "AV1 (SVT-AV1)",
        hardware: false,
        rate_controls: &[Crf, Vbr],
        presets: SVT_PRESETS,
        tunes: &[],
        default_rate_control: Crf,
        default_quality: 35,
        default_preset: "8",
        quality_min: 0,
        quality_max: 63,
        cq_flag: "-cq",
    },
    EncoderCapability {
        id: "copy",
        label: "Stream copy (no re-encode)",
        hardware: false,
        rate_controls: &[],
        presets: &[],
        tunes: &[],
        default_rate_control: Crf,
        default_quality: 0,
        default_preset: "",
        quality_min: 0,
        quality_max: 0,
        cq_flag: "-cq",
    },
];

/// Capability record for an encoder; `None` for unknown identifiers
pub fn capability(encoder: &EncoderType) -> Option<&'static EncoderCapability> {
    match encoder {
        EncoderType::Unknown(_) => None,
        known => capability_by_id(known.as_str()),
    }
}

pub fn capability_by_id(id: &str) -> Option<&'static EncoderCapability> {
    CAPABILITIES.iter().find(|c| c.id == id)
}

/// Every capability record, in presentation order
pub fn all_capabilities() -> &'static [EncoderCapability] {
    &CAPABILITIES
}

/// Encoder list for pickers
pub fn list_encoders() -> Vec<EncoderOption> {
    CAPABILITIES
        .iter()
        .map(|c| EncoderOption {
            id: c.id,
            label: c.label,
            hardware: c.hardware,
        })
        .collect()
}

/// Speed-preset vocabulary of every encoder
pub fn preset_options() -> BTreeMap<&'static str, &'static [&'static str]> {
    CAPABILITIES.iter().map(|c| (c.id, c.presets)).collect()
}

pub fn rate_control_modes(encoder: &EncoderType) -> &'static [RateControlMode] {
    capability(encoder).map(|c| c.rate_controls).unwrap_or(&[])
}

pub fn quality_range(encoder: &EncoderType) -> Option<RangeInclusive<i32>> {
    capability(encoder).map(EncoderCapability::quality_range)
}

/// Flag carrying the quality value for an encoder in the given mode; bitrate
/// modes have none
pub fn quality_flag(encoder: &EncoderType, mode: RateControlMode) -> Option<&'static str> {
    match mode {
        Crf => Some("-crf"),
        Constqp => Some("-qp"),
        Cq => Some(capability(encoder).map(|c| c.cq_flag).unwrap_or("-cq")),
        Cbr | Vbr => None,
    }
}

/// True when a tune belongs to some encoder's own vocabulary
fn is_encoder_specific_tune(tune: &str) -> bool {
    CAPABILITIES.iter().any(|c| c.tunes.contains(&tune))
}

fn clear_bitrate_fields(video: &mut VideoConfig) {
    video.bitrate_kbps = None;
    video.max_bitrate_kbps = None;
    video.buffer_size_kbits = None;
    video.pass = None;
}

/// Strip fields that do not apply to the configured encoder and mode before a
/// preset is stored
pub fn normalize_video_for_save(video: &VideoConfig) -> VideoConfig {
    if video.encoder.is_copy() {
        return VideoConfig::new(EncoderType::Copy);
    }

    let mut normalized = video.clone();
    if normalized
        .rate_control
        .is_some_and(|mode| mode.is_constant_quality())
    {
        clear_bitrate_fields(&mut normalized);
    }

    let own_tunes = capability(&normalized.encoder).map(|c| c.tunes).unwrap_or(&[]);
    if let Some(tune) = normalized.tune.as_deref() {
        if is_encoder_specific_tune(tune) && !own_tunes.contains(&tune) {
            normalized.tune = None;
        }
    }
    normalized
}

/// Switch a video configuration to another encoder, carrying over whatever the
/// new encoder supports
pub fn apply_encoder_change(previous: &VideoConfig, encoder: EncoderType) -> VideoConfig {
    let Some(cap) = capability(&encoder) else {
        let mut changed = previous.clone();
        changed.encoder = encoder;
        return changed;
    };
    if encoder.is_copy() {
        return VideoConfig::new(EncoderType::Copy);
    }

    let mut changed = previous.clone();
    changed.encoder = encoder;

    let mode = previous
        .rate_control
        .filter(|m| cap.supports(*m))
        .unwrap_or(cap.default_rate_control);
    changed.rate_control = Some(mode);
    changed.quality_value = Some(
        previous
            .quality_value
            .map(|q| cap.clamp_quality(q))
            .unwrap_or(cap.default_quality),
    );
    changed.preset = match previous.preset.as_deref() {
        Some(p) if cap.accepts_preset(p) => Some(p.to_string()),
        _ => Some(cap.default_preset.to_string()),
    };
    if mode.is_constant_quality() {
        clear_bitrate_fields(&mut changed);
    }

    normalize_video_for_save(&changed)
}

/// Switch the rate-control mode, resetting fields the new mode does not use
pub fn apply_rate_control_change(previous: &VideoConfig, mode: RateControlMode) -> VideoConfig {
    let mut changed = previous.clone();
    changed.rate_control = Some(mode);
    if mode.is_constant_quality() {
        clear_bitrate_fields(&mut changed);
        if let Some(cap) = capability(&changed.encoder) {
            changed.quality_value = Some(
                changed
                    .quality_value
                    .map(|q| cap.clamp_quality(q))
                    .unwrap_or(cap.default_quality),
            );
        }
    }
    changed
}
