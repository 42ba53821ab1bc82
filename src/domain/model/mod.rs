// Domain models - Preset records shared by the importer, renderer and validator

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder substituted for the single input path
pub const INPUT_PLACEHOLDER: &str = "INPUT";

/// Placeholder substituted for the single output path
pub const OUTPUT_PLACEHOLDER: &str = "OUTPUT";

/// Program name every canonical command starts with
pub const PROGRAM_NAME: &str = "ffmpeg";

/// The only `-passlogfile` prefix a structured preset may carry. The runner
/// owns two-pass log files, so user supplied prefixes could collide.
pub const TWO_PASS_LOG_PREFIX: &str = "ffpreset-2pass";

/// Video encoder identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EncoderType {
    Libx264,
    Libx265,
    H264Nvenc,
    HevcNvenc,
    Av1Nvenc,
    HevcQsv,
    Av1Qsv,
    HevcAmf,
    Av1Amf,
    LibSvtAv1,
    Copy,
    /// Identifier with no capability record; never produced by the importer
    Unknown(String),
}

impl EncoderType {
    /// Every encoder with a capability record, in presentation order
    pub const KNOWN: [EncoderType; 11] = [
        EncoderType::Libx264,
        EncoderType::Libx265,
        EncoderType::H264Nvenc,
        EncoderType::HevcNvenc,
        EncoderType::Av1Nvenc,
        EncoderType::HevcQsv,
        EncoderType::Av1Qsv,
        EncoderType::HevcAmf,
        EncoderType::Av1Amf,
        EncoderType::LibSvtAv1,
        EncoderType::Copy,
    ];

    /// Resolve an ffmpeg encoder name; `None` when the name is not known
    pub fn parse(id: &str) -> Option<Self> {
        let encoder = match id {
            "libx264" => EncoderType::Libx264,
            "libx265" => EncoderType::Libx265,
            "h264_nvenc" => EncoderType::H264Nvenc,
            "hevc_nvenc" => EncoderType::HevcNvenc,
            "av1_nvenc" => EncoderType::Av1Nvenc,
            "hevc_qsv" => EncoderType::HevcQsv,
            "av1_qsv" => EncoderType::Av1Qsv,
            "hevc_amf" => EncoderType::HevcAmf,
            "av1_amf" => EncoderType::Av1Amf,
            "libsvtav1" => EncoderType::LibSvtAv1,
            "copy" => EncoderType::Copy,
            _ => return None,
        };
        Some(encoder)
    }

    /// The ffmpeg encoder name
    pub fn as_str(&self) -> &str {
        match self {
            EncoderType::Libx264 => "libx264",
            EncoderType::Libx265 => "libx265",
            EncoderType::H264Nvenc => "h264_nvenc",
            EncoderType::HevcNvenc => "hevc_nvenc",
            EncoderType::Av1Nvenc => "av1_nvenc",
            EncoderType::HevcQsv => "hevc_qsv",
            EncoderType::Av1Qsv => "av1_qsv",
            EncoderType::HevcAmf => "hevc_amf",
            EncoderType::Av1Amf => "av1_amf",
            EncoderType::LibSvtAv1 => "libsvtav1",
            EncoderType::Copy => "copy",
            EncoderType::Unknown(id) => id,
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, EncoderType::Copy)
    }
}

impl From<String> for EncoderType {
    fn from(id: String) -> Self {
        EncoderType::parse(&id).unwrap_or(EncoderType::Unknown(id))
    }
}

impl From<EncoderType> for String {
    fn from(encoder: EncoderType) -> Self {
        encoder.as_str().to_string()
    }
}

impl fmt::Display for EncoderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio codec choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodecType {
    Copy,
    Aac,
}

impl AudioCodecType {
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "copy" => Some(AudioCodecType::Copy),
            "aac" => Some(AudioCodecType::Aac),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodecType::Copy => "copy",
            AudioCodecType::Aac => "aac",
        }
    }
}

/// Video rate-control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateControlMode {
    Crf,
    Cq,
    Constqp,
    Cbr,
    Vbr,
}

impl RateControlMode {
    /// Modes driven by a single quality knob rather than a bitrate
    pub fn is_constant_quality(&self) -> bool {
        matches!(
            self,
            RateControlMode::Crf | RateControlMode::Cq | RateControlMode::Constqp
        )
    }

    pub fn is_bitrate(&self) -> bool {
        !self.is_constant_quality()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RateControlMode::Crf => "crf",
            RateControlMode::Cq => "cq",
            RateControlMode::Constqp => "constqp",
            RateControlMode::Cbr => "cbr",
            RateControlMode::Vbr => "vbr",
        }
    }
}

impl fmt::Display for RateControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverwriteBehavior {
    Ask,
    Overwrite,
    NoOverwrite,
}

/// Global (pre-input) flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// `-y` / `-n`; `None` and `Ask` emit nothing
    pub overwrite_behavior: Option<OverwriteBehavior>,
    pub log_level: Option<String>,
    pub hide_banner: Option<bool>,
    pub enable_report: Option<bool>,
}

impl GlobalConfig {
    pub fn is_empty(&self) -> bool {
        self == &GlobalConfig::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeekMode {
    /// `-ss` before `-i`
    Input,
    /// `-ss` after `-i`
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationMode {
    /// `-t`
    Duration,
    /// `-to`
    To,
}

/// Seek, duration and input-side timeline flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTimelineConfig {
    pub seek_mode: Option<SeekMode>,
    pub seek_position: Option<String>,
    pub duration_mode: Option<DurationMode>,
    pub duration: Option<String>,
    pub accurate_seek: Option<bool>,
    /// `-stream_loop`; a float so hand-edited fractional values can be reported
    pub stream_loop: Option<f64>,
    /// `-itsoffset`
    pub input_time_offset: Option<String>,
}

impl InputTimelineConfig {
    pub fn is_empty(&self) -> bool {
        self == &InputTimelineConfig::default()
    }
}

/// Stream selection and metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    #[serde(default)]
    pub maps: Vec<String>,
    /// `key=value` entries for `-metadata`
    #[serde(default)]
    pub metadata: Vec<String>,
    /// `"<spec> <value>"` entries for `-disposition:<spec> <value>`, or a bare
    /// value for `-disposition <value>`
    #[serde(default)]
    pub dispositions: Vec<String>,
    pub map_metadata_from_input_file_index: Option<i32>,
    pub map_chapters_from_input_file_index: Option<i32>,
}

impl MappingConfig {
    pub fn is_empty(&self) -> bool {
        self == &MappingConfig::default()
    }
}

/// Video encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    pub encoder: EncoderType,
    pub rate_control: Option<RateControlMode>,
    pub quality_value: Option<i32>,
    pub preset: Option<String>,
    pub tune: Option<String>,
    pub profile: Option<String>,
    /// Target bitrate in kbps (`-b:v`)
    pub bitrate_kbps: Option<i32>,
    /// Max bitrate in kbps (`-maxrate`)
    pub max_bitrate_kbps: Option<i32>,
    /// VBV buffer in kbits (`-bufsize`)
    pub buffer_size_kbits: Option<i32>,
    /// 2 marks two-pass encoding; 1 is accepted from stored presets and
    /// normalized to 2
    pub pass: Option<u8>,
    pub level: Option<String>,
    pub gop_size: Option<u32>,
    pub bf: Option<u32>,
    pub pix_fmt: Option<String>,
    pub b_ref_mode: Option<String>,
    pub rc_lookahead: Option<u32>,
    pub spatial_aq: Option<bool>,
    pub temporal_aq: Option<bool>,
}

impl VideoConfig {
    /// Encoder with every optional field unset
    pub fn new(encoder: EncoderType) -> Self {
        Self {
            encoder,
            rate_control: None,
            quality_value: None,
            preset: None,
            tune: None,
            profile: None,
            bitrate_kbps: None,
            max_bitrate_kbps: None,
            buffer_size_kbits: None,
            pass: None,
            level: None,
            gop_size: None,
            bf: None,
            pix_fmt: None,
            b_ref_mode: None,
            rc_lookahead: None,
            spatial_aq: None,
            temporal_aq: None,
        }
    }

    pub fn is_two_pass(&self) -> bool {
        matches!(self.pass, Some(1 | 2))
    }
}

/// Audio encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub codec: AudioCodecType,
    /// kbps
    pub bitrate: Option<i32>,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,
    /// `loudnorm` profile; `None` or `"none"` adds no filter
    pub loudness_profile: Option<String>,
    pub target_lufs: Option<f64>,
    pub loudness_range: Option<f64>,
    pub true_peak_db: Option<f64>,
}

impl AudioConfig {
    pub fn new(codec: AudioCodecType) -> Self {
        Self {
            codec,
            bitrate: None,
            sample_rate_hz: None,
            channels: None,
            channel_layout: None,
            loudness_profile: None,
            target_lufs: None,
            loudness_range: None,
            true_peak_db: None,
        }
    }

    pub fn has_loudness_filter(&self) -> bool {
        self.loudness_profile
            .as_deref()
            .is_some_and(|p| !p.is_empty() && p != "none")
    }
}

/// Filter settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub scale: Option<String>,
    pub crop: Option<String>,
    pub fps: Option<u32>,
    /// Unrecognised `-vf` segments, comma joined
    pub vf_chain: Option<String>,
    pub af_chain: Option<String>,
    pub filter_complex: Option<String>,
}

impl FilterConfig {
    pub fn has_simple_video_filters(&self) -> bool {
        self.scale.as_deref().is_some_and(|s| !s.is_empty())
            || self.crop.as_deref().is_some_and(|s| !s.is_empty())
            || self.fps.is_some_and(|f| f > 0)
            || self.vf_chain.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubtitleStrategy {
    Keep,
    Drop,
    BurnIn,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitlesConfig {
    pub strategy: Option<SubtitleStrategy>,
    /// Full `subtitles=...` filter segment
    pub burn_in_filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerConfig {
    pub format: Option<String>,
    #[serde(default)]
    pub movflags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareConfig {
    pub hwaccel: Option<String>,
    pub hwaccel_device: Option<String>,
    pub hwaccel_output_format: Option<String>,
    #[serde(default)]
    pub bitstream_filters: Vec<String>,
}

/// Usage statistics, all zero for a new preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetStats {
    pub usage_count: u64,
    #[serde(rename = "totalInputSizeMB", alias = "totalInputSizeMb")]
    pub total_input_size_mb: f64,
    #[serde(rename = "totalOutputSizeMB", alias = "totalOutputSizeMb")]
    pub total_output_size_mb: f64,
    pub total_time_seconds: f64,
}

/// Structured preset: the fully decomposed form of a command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FFmpegPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub global: Option<GlobalConfig>,
    pub input: Option<InputTimelineConfig>,
    pub mapping: Option<MappingConfig>,
    pub video: VideoConfig,
    pub audio: AudioConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    pub subtitles: Option<SubtitlesConfig>,
    pub container: Option<ContainerConfig>,
    pub hardware: Option<HardwareConfig>,
    #[serde(default)]
    pub stats: PresetStats,
    pub advanced_enabled: Option<bool>,
    pub ffmpeg_template: Option<String>,
}

impl FFmpegPreset {
    /// Minimal preset for the given encoders; every optional group unset
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        video: VideoConfig,
        audio: AudioConfig,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            global: None,
            input: None,
            mapping: None,
            video,
            audio,
            filters: FilterConfig::default(),
            subtitles: None,
            container: None,
            hardware: None,
            stats: PresetStats::default(),
            advanced_enabled: None,
            ffmpeg_template: None,
        }
    }

    /// True when the preset runs an opaque template instead of its fields
    pub fn uses_custom_template(&self) -> bool {
        self.advanced_enabled.unwrap_or(false)
            && self
                .ffmpeg_template
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests;
