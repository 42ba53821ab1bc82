//! Canonical renderer
//!
//! Turns a preset back into the single command line the importer accepts for
//! it. Flag order is fixed; the round-trip verifier compares against exactly
//! this output, so any change here changes which commands stay editable.

use crate::command::lexer::{lex, quote_if_needed};
use crate::domain::model::*;
use crate::registry::{self, EncoderCapability};

/// Argument accumulator
#[derive(Debug, Default)]
struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    fn switch(&mut self, flag: &str) {
        self.args.push(flag.to_string());
    }

    fn option(&mut self, flag: &str, value: impl AsRef<str>) {
        self.args.push(flag.to_string());
        self.args.push(quote_if_needed(value.as_ref()));
    }

    /// Emit `flag value` for a non-empty value
    fn option_opt(&mut self, flag: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.option(flag, value);
        }
    }
}

/// Full argument vector, program name first
pub fn render_args(preset: &FFmpegPreset) -> Vec<String> {
    if preset.uses_custom_template() {
        let template = preset.ffmpeg_template.as_deref().unwrap_or_default();
        let mut args = vec![PROGRAM_NAME.to_string()];
        args.extend(lex(template));
        return args;
    }

    let mut cmd = CommandLine::default();
    cmd.switch(PROGRAM_NAME);
    render_global(&mut cmd, preset.global.as_ref());
    render_input(&mut cmd, preset);
    render_mapping(&mut cmd, preset.mapping.as_ref());
    render_video(&mut cmd, &preset.video);
    if let Some(hardware) = &preset.hardware {
        for bsf in hardware.bitstream_filters.iter().filter(|b| !b.is_empty()) {
            cmd.option("-bsf", bsf);
        }
    }
    render_audio(&mut cmd, &preset.audio);
    render_filters(&mut cmd, preset);
    if preset
        .subtitles
        .as_ref()
        .is_some_and(|s| s.strategy == Some(SubtitleStrategy::Drop))
    {
        cmd.switch("-sn");
    }
    if let Some(container) = &preset.container {
        cmd.option_opt("-f", container.format.as_deref());
        let flags: Vec<&str> = container
            .movflags
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if !flags.is_empty() {
            cmd.option("-movflags", flags.join("+"));
        }
    }
    cmd.switch(OUTPUT_PLACEHOLDER);
    cmd.args
}

/// Rendered command as one line
pub fn render_command(preset: &FFmpegPreset) -> String {
    if preset.uses_custom_template() {
        let template = preset.ffmpeg_template.as_deref().unwrap_or_default();
        return format!("{PROGRAM_NAME} {}", template.trim());
    }
    render_args(preset).join(" ")
}

fn render_global(cmd: &mut CommandLine, global: Option<&GlobalConfig>) {
    let Some(global) = global else {
        return;
    };
    match global.overwrite_behavior {
        Some(OverwriteBehavior::Overwrite) => cmd.switch("-y"),
        Some(OverwriteBehavior::NoOverwrite) => cmd.switch("-n"),
        Some(OverwriteBehavior::Ask) | None => {}
    }
    cmd.option_opt("-loglevel", global.log_level.as_deref());
    if global.hide_banner.unwrap_or(false) {
        cmd.switch("-hide_banner");
    }
    if global.enable_report.unwrap_or(false) {
        cmd.switch("-report");
    }
}

fn render_input(cmd: &mut CommandLine, preset: &FFmpegPreset) {
    if let Some(hardware) = &preset.hardware {
        cmd.option_opt("-hwaccel", hardware.hwaccel.as_deref());
        cmd.option_opt("-hwaccel_device", hardware.hwaccel_device.as_deref());
        cmd.option_opt(
            "-hwaccel_output_format",
            hardware.hwaccel_output_format.as_deref(),
        );
    }

    let timeline = preset.input.as_ref();
    let seek = timeline.and_then(|t| t.seek_position.as_deref());
    let output_seek = timeline.is_some_and(|t| t.seek_mode == Some(SeekMode::Output));

    if let Some(timeline) = timeline {
        if !output_seek {
            cmd.option_opt("-ss", seek);
        }
        if timeline.accurate_seek.unwrap_or(false) {
            cmd.switch("-accurate_seek");
        }
        if let Some(count) = timeline.stream_loop {
            cmd.option("-stream_loop", format_number(count));
        }
        cmd.option_opt("-itsoffset", timeline.input_time_offset.as_deref());
    }

    cmd.option("-i", INPUT_PLACEHOLDER);

    if let Some(timeline) = timeline {
        if output_seek {
            cmd.option_opt("-ss", seek);
        }
        let flag = match timeline.duration_mode {
            Some(DurationMode::To) => "-to",
            _ => "-t",
        };
        cmd.option_opt(flag, timeline.duration.as_deref());
    }
}

fn render_mapping(cmd: &mut CommandLine, mapping: Option<&MappingConfig>) {
    let Some(mapping) = mapping else {
        return;
    };
    for map in mapping.maps.iter().filter(|m| !m.is_empty()) {
        cmd.option("-map", map);
    }
    if let Some(index) = mapping.map_metadata_from_input_file_index {
        cmd.option("-map_metadata", index.to_string());
    }
    if let Some(index) = mapping.map_chapters_from_input_file_index {
        cmd.option("-map_chapters", index.to_string());
    }
    for disposition in mapping.dispositions.iter().map(|d| d.trim()) {
        match disposition.split_once(char::is_whitespace) {
            Some((spec, value)) if !value.trim().is_empty() => {
                cmd.option(&format!("-disposition:{spec}"), value.trim());
            }
            _ if !disposition.is_empty() => cmd.option("-disposition", disposition),
            _ => {}
        }
    }
    for entry in mapping.metadata.iter().filter(|m| !m.is_empty()) {
        cmd.option("-metadata", entry);
    }
}

fn render_video(cmd: &mut CommandLine, video: &VideoConfig) {
    cmd.option("-c:v", video.encoder.as_str());
    if video.encoder.is_copy() {
        return;
    }

    let cap = registry::capability(&video.encoder);
    let mode = video
        .rate_control
        .or_else(|| cap.map(|c| c.default_rate_control));

    match mode {
        Some(RateControlMode::Constqp) => {
            cmd.option("-rc", "constqp");
            if let Some(quality) = quality_or_default(video, cap) {
                cmd.option("-qp", quality.to_string());
            }
        }
        Some(mode @ (RateControlMode::Crf | RateControlMode::Cq)) => {
            if let (Some(flag), Some(quality)) = (
                registry::quality_flag(&video.encoder, mode),
                quality_or_default(video, cap),
            ) {
                cmd.option(flag, quality.to_string());
            }
        }
        Some(RateControlMode::Cbr | RateControlMode::Vbr) => {
            if let Some(bitrate) = video.bitrate_kbps {
                cmd.option("-b:v", format!("{bitrate}k"));
            }
            if let Some(maxrate) = video.max_bitrate_kbps {
                cmd.option("-maxrate", format!("{maxrate}k"));
            }
            if let Some(bufsize) = video.buffer_size_kbits {
                cmd.option("-bufsize", format!("{bufsize}k"));
            }
            if video.is_two_pass() {
                cmd.option("-pass", "2");
                cmd.option("-passlogfile", TWO_PASS_LOG_PREFIX);
            }
        }
        None => {}
    }

    let preset = video
        .preset
        .as_deref()
        .or_else(|| cap.map(|c| c.default_preset));
    cmd.option_opt("-preset", preset);
    cmd.option_opt("-tune", video.tune.as_deref());
    cmd.option_opt("-profile:v", video.profile.as_deref());
    cmd.option_opt("-level", video.level.as_deref());
    if let Some(gop) = video.gop_size {
        cmd.option("-g", gop.to_string());
    }
    if let Some(bf) = video.bf {
        cmd.option("-bf", bf.to_string());
    }
    cmd.option_opt("-pix_fmt", video.pix_fmt.as_deref());
    cmd.option_opt("-b_ref_mode", video.b_ref_mode.as_deref());
    if let Some(lookahead) = video.rc_lookahead {
        cmd.option("-rc-lookahead", lookahead.to_string());
    }
    if video.spatial_aq.unwrap_or(false) {
        cmd.option("-spatial-aq", "1");
    }
    if video.temporal_aq.unwrap_or(false) {
        cmd.option("-temporal-aq", "1");
    }
}

fn quality_or_default(video: &VideoConfig, cap: Option<&EncoderCapability>) -> Option<i32> {
    video.quality_value.or_else(|| cap.map(|c| c.default_quality))
}

fn render_audio(cmd: &mut CommandLine, audio: &AudioConfig) {
    cmd.option("-c:a", audio.codec.as_str());
    if audio.codec == AudioCodecType::Copy {
        return;
    }
    if let Some(bitrate) = audio.bitrate {
        cmd.option("-b:a", format!("{bitrate}k"));
    }
    if let Some(rate) = audio.sample_rate_hz {
        cmd.option("-ar", rate.to_string());
    }
    if let Some(channels) = audio.channels {
        cmd.option("-ac", channels.to_string());
    }
    cmd.option_opt("-channel_layout", audio.channel_layout.as_deref());
}

fn render_filters(cmd: &mut CommandLine, preset: &FFmpegPreset) {
    let filters = &preset.filters;
    let video_filters = !preset.video.encoder.is_copy();

    if video_filters {
        let mut parts: Vec<String> = Vec::new();
        if let Some(scale) = filters.scale.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("scale={scale}"));
        }
        if let Some(crop) = filters.crop.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("crop={crop}"));
        }
        if let Some(fps) = filters.fps.filter(|f| *f > 0) {
            parts.push(format!("fps={fps}"));
        }
        if let Some(subtitles) = &preset.subtitles {
            if subtitles.strategy == Some(SubtitleStrategy::BurnIn) {
                if let Some(filter) = subtitles.burn_in_filter.as_deref().filter(|f| !f.is_empty()) {
                    parts.push(filter.to_string());
                }
            }
        }
        if let Some(chain) = filters.vf_chain.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            parts.push(chain.to_string());
        }
        if !parts.is_empty() {
            cmd.option("-vf", parts.join(","));
        }
    }

    if preset.audio.codec != AudioCodecType::Copy {
        let mut parts = Vec::new();
        if let Some(loudnorm) = loudnorm_filter(&preset.audio) {
            parts.push(loudnorm);
        }
        if let Some(chain) = filters.af_chain.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            parts.push(chain.to_string());
        }
        if !parts.is_empty() {
            cmd.option("-af", parts.join(","));
        }
    }

    if video_filters {
        cmd.option_opt("-filter_complex", filters.filter_complex.as_deref());
    }
}

/// `loudnorm` expression for the configured loudness profile
pub fn loudnorm_filter(audio: &AudioConfig) -> Option<String> {
    if !audio.has_loudness_filter() {
        return None;
    }
    let broadcast = audio.loudness_profile.as_deref() == Some("cnBroadcast");
    let integrated = audio
        .target_lufs
        .unwrap_or(if broadcast { -24.0 } else { -23.0 })
        .clamp(-36.0, -10.0);
    let range = audio.loudness_range.unwrap_or(7.0).clamp(1.0, 20.0);
    let true_peak = audio
        .true_peak_db
        .unwrap_or(if broadcast { -2.0 } else { -1.0 })
        .min(-0.1);
    Some(format!(
        "loudnorm=I={integrated}:LRA={range}:TP={true_peak}:print_format=summary"
    ))
}

/// Whole numbers without a trailing `.0`
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::lexer::lex;
    use crate::parser::parse_structured;

    fn x264_preset() -> FFmpegPreset {
        let mut video = VideoConfig::new(EncoderType::Libx264);
        video.rate_control = Some(RateControlMode::Crf);
        video.quality_value = Some(23);
        video.preset = Some("medium".to_string());
        let mut preset = FFmpegPreset::new("p", "x264", video, AudioConfig::new(AudioCodecType::Copy));
        preset.mapping = Some(MappingConfig {
            maps: vec!["0".to_string()],
            ..MappingConfig::default()
        });
        preset
    }

    #[test]
    fn test_minimal_render() {
        assert_eq!(
            render_command(&x264_preset()),
            "ffmpeg -i INPUT -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy OUTPUT"
        );
    }

    #[test]
    fn test_missing_fields_fall_back_to_registry() {
        let mut preset = x264_preset();
        preset.video.rate_control = None;
        preset.video.quality_value = None;
        preset.video.preset = None;
        assert_eq!(
            render_command(&preset),
            "ffmpeg -i INPUT -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy OUTPUT"
        );
    }

    #[test]
    fn test_qsv_uses_global_quality() {
        let mut preset = x264_preset();
        preset.video = registry::apply_encoder_change(&preset.video, EncoderType::HevcQsv);
        let args = render_args(&preset);
        assert!(args.windows(2).any(|w| w == ["-global_quality", "23"]));
    }

    #[test]
    fn test_two_pass_uses_managed_log_prefix() {
        let mut preset = x264_preset();
        preset.video.rate_control = Some(RateControlMode::Vbr);
        preset.video.bitrate_kbps = Some(3000);
        preset.video.max_bitrate_kbps = Some(4500);
        preset.video.pass = Some(1);
        let line = render_command(&preset);
        assert!(line.contains("-b:v 3000k -maxrate 4500k -pass 2 -passlogfile ffpreset-2pass -preset medium"));
        assert!(!line.contains("-crf"));
    }

    #[test]
    fn test_copy_skips_video_filters_and_quality() {
        let mut preset = x264_preset();
        preset.video = VideoConfig::new(EncoderType::Copy);
        preset.filters.scale = Some("1280:-2".to_string());
        assert_eq!(
            render_command(&preset),
            "ffmpeg -i INPUT -map 0 -c:v copy -c:a copy OUTPUT"
        );
    }

    #[test]
    fn test_values_with_spaces_are_quoted() {
        let mut preset = x264_preset();
        if let Some(mapping) = preset.mapping.as_mut() {
            mapping.metadata.push("title=My Film".to_string());
        }
        assert!(render_command(&preset).contains("-metadata \"title=My Film\""));
    }

    #[test]
    fn test_loudnorm_is_clamped() {
        let mut audio = AudioConfig::new(AudioCodecType::Aac);
        audio.loudness_profile = Some("ebuR128".to_string());
        audio.target_lufs = Some(-50.0);
        assert_eq!(
            loudnorm_filter(&audio).as_deref(),
            Some("loudnorm=I=-36:LRA=7:TP=-1:print_format=summary")
        );
        audio.loudness_profile = Some("none".to_string());
        assert_eq!(loudnorm_filter(&audio), None);
    }

    #[test]
    fn test_custom_template_renders_verbatim() {
        let mut preset = x264_preset();
        preset.advanced_enabled = Some(true);
        preset.ffmpeg_template = Some("-i INPUT -c:v libvpx-vp9 OUTPUT".to_string());
        assert_eq!(render_command(&preset), "ffmpeg -i INPUT -c:v libvpx-vp9 OUTPUT");
        assert_eq!(render_args(&preset).len(), 6);
    }

    #[test]
    fn test_parsed_commands_render_back() {
        for line in [
            "ffmpeg -y -hide_banner -ss 00:00:05 -i INPUT -t 10 -map 0:v:0 -map 0:a? -c:v libx265 -crf 28 -preset slow -tune grain -c:a aac -b:a 192k -ar 48000 OUTPUT",
            "ffmpeg -hwaccel cuda -stream_loop -1 -i INPUT -map 0 -map_metadata -1 -disposition:a:0 default -metadata \"title=A B\" -c:v h264_nvenc -rc constqp -qp 20 -preset p7 -rc-lookahead 32 -spatial-aq 1 -bsf h264_mp4toannexb -c:a copy -f mp4 -movflags faststart+frag_keyframe OUTPUT",
            "ffmpeg -i INPUT -map 0 -c:v libx264 -b:v 3000k -maxrate 4000k -bufsize 8000k -pass 2 -passlogfile ffpreset-2pass -preset slow -c:a copy -vf scale=1280:-2,hqdn3d -sn OUTPUT",
        ] {
            let preset = parse_structured(&lex(line)).expect(line);
            assert_eq!(render_command(&preset), line);
        }
    }
}
