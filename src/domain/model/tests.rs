// Unit tests for preset models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;

    #[test]
    fn test_encoder_type_parse_known_ids() {
        assert_eq!(EncoderType::parse("libx264"), Some(EncoderType::Libx264));
        assert_eq!(EncoderType::parse("hevc_qsv"), Some(EncoderType::HevcQsv));
        assert_eq!(EncoderType::parse("copy"), Some(EncoderType::Copy));
        assert_eq!(EncoderType::parse("libvpx-vp9"), None);
    }

    #[test]
    fn test_encoder_type_serializes_as_ffmpeg_name() {
        let json = serde_json::to_string(&EncoderType::LibSvtAv1).unwrap();
        assert_eq!(json, "\"libsvtav1\"");

        let parsed: EncoderType = serde_json::from_str("\"h264_nvenc\"").unwrap();
        assert_eq!(parsed, EncoderType::H264Nvenc);
    }

    #[test]
    fn test_unknown_encoder_survives_deserialization() {
        let parsed: EncoderType = serde_json::from_str("\"libvpx-vp9\"").unwrap();
        assert_eq!(parsed, EncoderType::Unknown("libvpx-vp9".to_string()));
        assert_eq!(parsed.as_str(), "libvpx-vp9");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"libvpx-vp9\"");
    }

    #[test]
    fn test_rate_control_classification() {
        assert!(RateControlMode::Crf.is_constant_quality());
        assert!(RateControlMode::Cq.is_constant_quality());
        assert!(RateControlMode::Constqp.is_constant_quality());
        assert!(RateControlMode::Cbr.is_bitrate());
        assert!(RateControlMode::Vbr.is_bitrate());
    }

    #[test]
    fn test_preset_json_uses_camel_case() {
        let mut video = VideoConfig::new(EncoderType::Libx264);
        video.rate_control = Some(RateControlMode::Crf);
        video.quality_value = Some(23);
        let preset = FFmpegPreset::new("p1", "Test", video, AudioConfig::new(AudioCodecType::Copy));

        let value = serde_json::to_value(&preset).unwrap();
        assert_eq!(value["video"]["rateControl"], "crf");
        assert_eq!(value["video"]["qualityValue"], 23);
        assert_eq!(value["audio"]["codec"], "copy");
        assert_eq!(value["stats"]["usageCount"], 0);
        assert_eq!(value["stats"]["totalInputSizeMB"], 0.0);
    }

    #[test]
    fn test_preset_accepts_legacy_stats_field_names() {
        let json = r#"{
            "id": "p1",
            "name": "Legacy",
            "video": { "encoder": "libx264" },
            "audio": { "codec": "aac" },
            "stats": {
                "usageCount": 3,
                "totalInputSizeMb": 10.0,
                "totalOutputSizeMb": 5.0,
                "totalTimeSeconds": 2.0
            }
        }"#;
        let preset: FFmpegPreset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.stats.usage_count, 3);
        assert_eq!(preset.stats.total_input_size_mb, 10.0);
        assert!(preset.video.rate_control.is_none());
        assert!(preset.mapping.is_none());
    }

    #[test]
    fn test_custom_template_requires_content() {
        let mut preset = FFmpegPreset::new(
            "p1",
            "Custom",
            VideoConfig::new(EncoderType::Copy),
            AudioConfig::new(AudioCodecType::Copy),
        );
        preset.advanced_enabled = Some(true);
        preset.ffmpeg_template = Some("   ".to_string());
        assert!(!preset.uses_custom_template());

        preset.ffmpeg_template = Some("-i INPUT OUTPUT".to_string());
        assert!(preset.uses_custom_template());
    }

    #[test]
    fn test_loudness_filter_detection() {
        let mut audio = AudioConfig::new(AudioCodecType::Aac);
        assert!(!audio.has_loudness_filter());
        audio.loudness_profile = Some("none".to_string());
        assert!(!audio.has_loudness_filter());
        audio.loudness_profile = Some("ebuR128".to_string());
        assert!(audio.has_loudness_filter());
    }
}
