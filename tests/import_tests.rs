use ffpreset::domain::model::*;
use ffpreset::*;

/// Canonical commands that must import as editable presets
const CANONICAL: &[&str] = &[
    "ffmpeg -i INPUT -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy OUTPUT",
    "ffmpeg -y -hide_banner -ss 00:00:05 -i INPUT -t 10 -map 0:v:0 -map 0:a -map_metadata 0 \
     -disposition:a:0 default -metadata title=Demo -c:v h264_nvenc -b:v 5000k -maxrate 8000k \
     -bufsize 16000k -preset p5 -c:a aac -b:a 192k -ar 48000 -ac 2 -vf scale=1280:-2,fps=30 \
     -sn -f mp4 -movflags faststart+frag_keyframe OUTPUT",
    "ffmpeg -i INPUT -ss 30 -to 90 -map 0 -c:v h264_nvenc -rc constqp -qp 21 -preset p7 -c:a copy OUTPUT",
    "ffmpeg -i INPUT -map 0 -c:v copy -c:a copy -f matroska OUTPUT",
];

fn structured(command: &str) -> FFmpegPreset {
    let analysis = analyze(command);
    assert!(
        analysis.eligibility.editable,
        "{command} was not editable: {:?}",
        analysis.reasons
    );
    analysis.structured_preset.unwrap()
}

#[test]
fn test_simple_libx264_import() {
    let analysis = analyze(
        "ffmpeg -y -i in.mp4 -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy out.mp4",
    );
    assert!(analysis.eligibility.editable);
    assert!(analysis.eligibility.custom);
    assert!(analysis.reasons.is_empty());

    let preset = analysis.structured_preset.unwrap();
    assert_eq!(preset.video.encoder, EncoderType::Libx264);
    assert_eq!(preset.video.rate_control, Some(RateControlMode::Crf));
    assert_eq!(preset.video.quality_value, Some(23));
    assert_eq!(preset.video.preset.as_deref(), Some("medium"));
    assert_eq!(preset.audio.codec, AudioCodecType::Copy);
    assert_eq!(
        analysis.normalized_template,
        "ffmpeg -y -i INPUT -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy OUTPUT"
    );
}

#[test]
fn test_multiple_inputs_rejected() {
    let analysis = analyze(
        "ffmpeg -y -i in.mp4 -i other.mp4 -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy out.mp4",
    );
    assert!(!analysis.eligibility.editable);
    assert!(!analysis.eligibility.custom);
    assert!(analysis.structured_preset.is_none());
    assert!(analysis.reasons.iter().any(|r| r.contains("multiple -i inputs")));
    match build_custom_preset(&analysis) {
        Err(PresetError::ImportFailed { reasons }) => assert_eq!(reasons, analysis.reasons),
        other => panic!("expected an import failure, got {other:?}"),
    }
}

#[test]
fn test_audio_filter_keeps_custom_only() {
    let analysis = analyze(
        "ffmpeg -i in.mp4 -map 0 -c:v libx264 -crf 23 -preset medium -c:a aac -af \"volume=2\" out.mp4",
    );
    assert!(!analysis.eligibility.editable);
    assert!(analysis.eligibility.custom);
    assert_eq!(analysis.reasons.len(), 1);
    assert!(analysis.reasons[0].contains("-af"));
}

#[test]
fn test_canonical_commands_round_trip() {
    for command in CANONICAL {
        let preset = structured(command);
        let expected = command.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(render_command(&preset), expected);
    }
}

#[test]
fn test_rendered_preset_reimports_to_same_preset() {
    for command in CANONICAL {
        let preset = structured(command);
        let mut again = structured(&render_command(&preset));
        again.id = preset.id.clone();
        assert_eq!(again, preset, "{command}");
    }
}

#[test]
fn test_runtime_flags_do_not_affect_round_trip() {
    let preset = structured(
        "ffmpeg -nostdin -i in.mp4 -map 0 -c:v libx264 -crf 20 -preset fast -c:a copy -progress pipe:2 out.mp4",
    );
    assert_eq!(
        render_command(&preset),
        "ffmpeg -i INPUT -map 0 -c:v libx264 -crf 20 -preset fast -c:a copy OUTPUT"
    );
}

#[test]
fn test_quoted_paths_with_spaces() {
    let analysis = analyze(
        "ffmpeg -i \"C:/My Videos/in.mp4\" -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy \"out file.mp4\"",
    );
    assert!(analysis.eligibility.editable, "{:?}", analysis.reasons);
}

#[test]
fn test_unsupported_parameter_falls_back_to_custom() {
    let analysis = analyze(
        "ffmpeg -i in.mp4 -c:v libx265 -crf 26 -x265-params keyint=60 -c:a aac -b:a 128k out.mkv",
    );
    assert!(!analysis.eligibility.editable);
    assert!(analysis.eligibility.custom);
    assert_eq!(analysis.reasons, vec!["unsupported parameter: -x265-params"]);

    let preset = build_custom_preset(&analysis).unwrap();
    assert_eq!(preset.id, analysis.preset_id());
    assert_eq!(preset.advanced_enabled, Some(true));
    assert_eq!(preset.video.encoder, EncoderType::Libx265);
    assert_eq!(preset.video.rate_control, Some(RateControlMode::Crf));
    assert_eq!(preset.video.quality_value, Some(26));
    assert_eq!(preset.video.preset.as_deref(), Some("medium"));
    assert_eq!(preset.audio.codec, AudioCodecType::Aac);
    assert_eq!(
        render_command(&preset),
        "ffmpeg -i INPUT -c:v libx265 -crf 26 -x265-params keyint=60 -c:a aac -b:a 128k OUTPUT"
    );
}

#[test]
fn test_fallback_bitrate_guess() {
    let analysis = analyze("ffmpeg -i in.mp4 -c:v h264_nvenc -b:v 6000k -weird 1 out.mp4");
    let preset = build_custom_preset(&analysis).unwrap();
    assert_eq!(preset.video.rate_control, Some(RateControlMode::Cbr));
    assert_eq!(preset.video.bitrate_kbps, Some(6000));
    assert_eq!(preset.audio.codec, AudioCodecType::Copy);
}

#[test]
fn test_preset_id_is_stable() {
    let command = "ffmpeg -i a.mp4 -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy b.mp4";
    assert_eq!(structured(command).id, structured(&format!("  {command}  ")).id);
}

#[test]
fn test_value_less_flag_before_output_stays_custom() {
    for command in [
        "ffmpeg -i in.mp4 -c:v libx264 -an out.mp4",
        "ffmpeg -i in.mp4 -map 0 -c:v libx264 -crf 23 -preset medium -c:a copy -shortest out.mp4",
    ] {
        let analysis = analyze(command);
        assert!(!analysis.eligibility.editable);
        assert!(analysis.eligibility.custom, "{command}: {:?}", analysis.reasons);
        assert_eq!(analysis.reasons.len(), 1);
        assert!(analysis.reasons[0].starts_with("unsupported parameter: -"));
        assert!(analysis.normalized_template.ends_with(" OUTPUT"));

        let preset = build_custom_preset(&analysis).unwrap();
        assert_eq!(preset.video.encoder, EncoderType::Libx264);
        assert!(render_command(&preset).ends_with(" OUTPUT"));
    }
}
