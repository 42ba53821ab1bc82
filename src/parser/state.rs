//! Accumulator threaded through the handlers during one import attempt

use crate::domain::model::*;
use crate::error::ImportError;
use crate::registry;

/// Video flags as seen on the command line, before rate control is inferred
#[derive(Debug, Clone, Default)]
pub struct PartialVideo {
    pub encoder: Option<EncoderType>,
    pub crf: Option<i32>,
    pub cq: Option<i32>,
    pub qp: Option<i32>,
    pub constqp: bool,
    pub bitrate_kbps: Option<i32>,
    pub max_bitrate_kbps: Option<i32>,
    pub buffer_size_kbits: Option<i32>,
    pub pass: Option<u8>,
    pub preset: Option<String>,
    pub tune: Option<String>,
    pub profile: Option<String>,
    pub level: Option<String>,
    pub gop_size: Option<u32>,
    pub bf: Option<u32>,
    pub pix_fmt: Option<String>,
    pub b_ref_mode: Option<String>,
    pub rc_lookahead: Option<u32>,
    pub spatial_aq: Option<bool>,
    pub temporal_aq: Option<bool>,
}

impl PartialVideo {
    /// Rate-control mode and quality implied by the flags present
    fn inferred_rate_control(&self) -> Option<(RateControlMode, Option<i32>)> {
        if self.constqp || self.qp.is_some() {
            Some((RateControlMode::Constqp, self.qp))
        } else if self.crf.is_some() {
            Some((RateControlMode::Crf, self.crf))
        } else if self.cq.is_some() {
            Some((RateControlMode::Cq, self.cq))
        } else if self.max_bitrate_kbps.is_some() || self.buffer_size_kbits.is_some() {
            Some((RateControlMode::Vbr, None))
        } else if self.bitrate_kbps.is_some() {
            Some((RateControlMode::Cbr, None))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PartialAudio {
    pub codec: Option<AudioCodecType>,
    pub bitrate: Option<i32>,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,
}

/// Mutable parse state; created per attempt and consumed by [`ParseState::finish`]
#[derive(Debug, Clone)]
pub struct ParseState {
    pub global: GlobalConfig,
    pub input: InputTimelineConfig,
    pub mapping: MappingConfig,
    pub video: PartialVideo,
    pub audio: PartialAudio,
    pub filters: FilterConfig,
    pub subtitles: SubtitlesConfig,
    pub container: ContainerConfig,
    pub hardware: HardwareConfig,
    pub saw_map: bool,
    pub before_input: bool,
    pub saw_input: bool,
    pub saw_output: bool,
    seen_once: Vec<&'static str>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseState {
    pub fn new() -> Self {
        Self {
            global: GlobalConfig::default(),
            input: InputTimelineConfig::default(),
            mapping: MappingConfig::default(),
            video: PartialVideo::default(),
            audio: PartialAudio::default(),
            filters: FilterConfig::default(),
            subtitles: SubtitlesConfig::default(),
            container: ContainerConfig::default(),
            hardware: HardwareConfig::default(),
            saw_map: false,
            before_input: true,
            saw_input: false,
            saw_output: false,
            seen_once: Vec::new(),
        }
    }

    /// Record a flag that may appear only once
    pub fn mark_once(&mut self, flag: &'static str) -> Result<(), ImportError> {
        if self.seen_once.contains(&flag) {
            return Err(ImportError::DuplicateOption {
                flag: flag.to_string(),
            });
        }
        self.seen_once.push(flag);
        Ok(())
    }

    /// Reject input-side flags once `-i` has been consumed
    pub fn require_before_input(&self, flag: &str) -> Result<(), ImportError> {
        if self.before_input {
            Ok(())
        } else {
            Err(ImportError::MustPrecedeInput {
                flag: flag.to_string(),
            })
        }
    }

    /// Post-scan checks and conversion into a preset
    pub fn finish(self) -> Result<FFmpegPreset, Vec<ImportError>> {
        let mut reasons = Vec::new();

        if !self.saw_input {
            reasons.push(ImportError::InputNotSeen);
        }
        if !self.saw_output {
            reasons.push(ImportError::MissingOutput);
        }
        if !self.saw_map {
            reasons.push(ImportError::MissingMap);
        }
        let video = match self.video.encoder.clone() {
            Some(encoder) => match build_video(&self.video, encoder) {
                Ok(video) => Some(video),
                Err(mut video_reasons) => {
                    reasons.append(&mut video_reasons);
                    None
                }
            },
            None => {
                reasons.push(ImportError::MissingVideoEncoder);
                None
            }
        };
        let audio_codec = self.audio.codec;
        if audio_codec.is_none() {
            reasons.push(ImportError::MissingAudioCodec);
        }

        let (Some(video), Some(codec), true) = (video, audio_codec, reasons.is_empty()) else {
            return Err(reasons);
        };

        let mut audio = AudioConfig::new(codec);
        audio.bitrate = self.audio.bitrate;
        audio.sample_rate_hz = self.audio.sample_rate_hz;
        audio.channels = self.audio.channels;
        audio.channel_layout = self.audio.channel_layout;

        let mut preset = FFmpegPreset::new(String::new(), String::new(), video, audio);
        preset.global = (!self.global.is_empty()).then_some(self.global);
        preset.input = (!self.input.is_empty()).then_some(self.input);
        preset.mapping = (!self.mapping.is_empty()).then_some(self.mapping);
        preset.filters = self.filters;
        preset.subtitles = (self.subtitles != SubtitlesConfig::default()).then_some(self.subtitles);
        preset.container = (self.container != ContainerConfig::default()).then_some(self.container);
        preset.hardware = (self.hardware != HardwareConfig::default()).then_some(self.hardware);
        Ok(preset)
    }
}

fn build_video(partial: &PartialVideo, encoder: EncoderType) -> Result<VideoConfig, Vec<ImportError>> {
    let mut video = VideoConfig::new(encoder.clone());
    video.tune = partial.tune.clone();
    video.profile = partial.profile.clone();
    video.bitrate_kbps = partial.bitrate_kbps;
    video.max_bitrate_kbps = partial.max_bitrate_kbps;
    video.buffer_size_kbits = partial.buffer_size_kbits;
    video.pass = partial.pass;
    video.level = partial.level.clone();
    video.gop_size = partial.gop_size;
    video.bf = partial.bf;
    video.pix_fmt = partial.pix_fmt.clone();
    video.b_ref_mode = partial.b_ref_mode.clone();
    video.rc_lookahead = partial.rc_lookahead;
    video.spatial_aq = partial.spatial_aq;
    video.temporal_aq = partial.temporal_aq;

    // Stream copy carries no quality settings; the renderer drops the rest.
    if encoder.is_copy() {
        return Ok(video);
    }

    let Some(cap) = registry::capability(&encoder) else {
        return Err(vec![ImportError::UnknownEncoder {
            encoder: encoder.to_string(),
        }]);
    };

    let mut reasons = Vec::new();
    let missing = |field: &str| ImportError::MissingVideoField {
        field: field.to_string(),
        encoder: encoder.to_string(),
    };

    match partial.inferred_rate_control() {
        Some((mode, quality)) => {
            if !cap.supports(mode) {
                reasons.push(ImportError::UnsupportedRateControl {
                    mode: mode.to_string(),
                    encoder: encoder.to_string(),
                });
            }
            video.rate_control = Some(mode);
            video.quality_value = match (mode.is_constant_quality(), quality) {
                (true, Some(q)) if cap.quality_range().contains(&q) => Some(q),
                (true, Some(q)) => {
                    reasons.push(ImportError::QualityOutOfRange {
                        value: q,
                        min: cap.quality_min,
                        max: cap.quality_max,
                        encoder: encoder.to_string(),
                    });
                    None
                }
                (true, None) => {
                    reasons.push(missing("quality value"));
                    None
                }
                (false, _) => Some(cap.default_quality),
            };
        }
        None => reasons.push(missing("rate control (-crf, -cq, -qp or -b:v)")),
    }

    match &partial.preset {
        Some(preset) => video.preset = Some(preset.clone()),
        None => reasons.push(missing("speed preset (-preset)")),
    }

    if reasons.is_empty() {
        Ok(video)
    } else {
        Err(reasons)
    }
}
