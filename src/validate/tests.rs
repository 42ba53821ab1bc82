// Unit tests for the preset editor validator

#[cfg(test)]
mod tests {
    use crate::domain::model::*;
    use crate::error::PresetError;
    use crate::validate::*;

    fn base_preset() -> FFmpegPreset {
        let mut video = VideoConfig::new(EncoderType::Libx264);
        video.rate_control = Some(RateControlMode::Crf);
        video.quality_value = Some(23);
        video.preset = Some("medium".to_string());
        FFmpegPreset::new("p", "test", video, AudioConfig::new(AudioCodecType::Copy))
    }

    fn keys(report: &ValidationReport) -> Vec<&str> {
        report.issues.iter().map(|i| i.message_key.as_str()).collect()
    }

    /// Apply the fix attached to the first issue with `key` and assert the
    /// issue is gone afterwards
    fn fix_and_recheck(preset: &mut FFmpegPreset, key: &str) {
        let report = validate_preset(preset);
        let issue = report
            .issues
            .iter()
            .find(|i| i.message_key == key)
            .unwrap_or_else(|| panic!("{key} not reported"));
        let id = issue.fix_id.expect("issue has a fix");
        apply_fix(preset, &report, id).unwrap();
        assert!(!keys(&validate_preset(preset)).contains(&key), "{key} survived its fix");

        // Re-applying is a no-op.
        let snapshot = preset.clone();
        apply_fix(preset, &report, id).unwrap();
        assert_eq!(*preset, snapshot);
    }

    #[test]
    fn test_clean_preset_has_no_issues() {
        let report = validate_preset(&base_preset());
        assert!(report.issues.is_empty());
        assert!(report.by_group.is_empty());
        assert!(!has_blocking_errors(&report));
    }

    #[test]
    fn test_empty_advanced_template() {
        let mut preset = base_preset();
        preset.advanced_enabled = Some(true);
        preset.ffmpeg_template = Some("  ".to_string());
        let report = validate_preset(&preset);
        assert_eq!(report.issues[0].level, IssueLevel::Warning);
        fix_and_recheck(&mut preset, "validation.advanced.emptyTemplate");
        assert_eq!(preset.advanced_enabled, Some(false));
    }

    #[test]
    fn test_timeline_expressions() {
        let mut preset = base_preset();
        preset.input = Some(InputTimelineConfig {
            seek_mode: Some(SeekMode::Input),
            seek_position: Some("1:5".to_string()),
            duration: Some("10".to_string()),
            input_time_offset: Some("-00:00:01.5".to_string()),
            ..InputTimelineConfig::default()
        });
        let report = validate_preset(&preset);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].field.as_deref(), Some("input.seekPosition"));
        assert!(has_blocking_errors(&report));

        fix_and_recheck(&mut preset, "validation.input.invalidTimeExpression");
        let input = preset.input.unwrap();
        assert_eq!(input.seek_position, None);
        assert_eq!(input.duration.as_deref(), Some("10"));
    }

    #[test]
    fn test_stream_loop_rules() {
        let mut preset = base_preset();
        preset.input = Some(InputTimelineConfig {
            stream_loop: Some(2.7),
            ..InputTimelineConfig::default()
        });
        fix_and_recheck(&mut preset, "validation.input.streamLoopNotInteger");
        assert_eq!(preset.input.as_ref().unwrap().stream_loop, Some(2.0));

        preset.input.as_mut().unwrap().stream_loop = Some(-3.0);
        fix_and_recheck(&mut preset, "validation.input.streamLoopBelowMinusOne");
        assert_eq!(preset.input.as_ref().unwrap().stream_loop, None);
    }

    #[test]
    fn test_mapping_rules() {
        let mut preset = base_preset();
        preset.mapping = Some(MappingConfig {
            maps: vec!["0".to_string()],
            metadata: vec!["title".to_string(), "=orphan".to_string(), "a=b".to_string()],
            dispositions: vec!["a:0".to_string(), "default".to_string(), "v forced".to_string()],
            map_metadata_from_input_file_index: Some(-2),
            map_chapters_from_input_file_index: Some(-1),
        });
        let report = validate_preset(&preset);
        assert_eq!(
            keys(&report),
            vec![
                "validation.mapping.indexBelowMinusOne",
                "validation.mapping.metadataMissingSeparator",
                "validation.mapping.metadataEmptyKey",
                "validation.mapping.dispositionMissingValue",
            ]
        );
        let empty_key = &report.issues[2];
        assert_eq!(empty_key.fix_id, None);
        assert_eq!(report.by_group[&IssueGroup::Mapping].errors, 4);
        let mapping_fixes = &report.by_group[&IssueGroup::Mapping].fixes;
        assert_eq!(mapping_fixes.len(), 3);
        for id in mapping_fixes {
            assert_eq!(report.fix(*id).unwrap().group, IssueGroup::Mapping);
        }

        fix_and_recheck(&mut preset, "validation.mapping.indexBelowMinusOne");
        fix_and_recheck(&mut preset, "validation.mapping.metadataMissingSeparator");
        fix_and_recheck(&mut preset, "validation.mapping.dispositionMissingValue");
        let mapping = preset.mapping.unwrap();
        assert_eq!(mapping.map_metadata_from_input_file_index, None);
        assert_eq!(mapping.metadata[0], "title=");
        assert_eq!(mapping.dispositions[0], "a:0 default");
    }

    #[test]
    fn test_maxrate_and_bufsize() {
        let mut preset = base_preset();
        preset.video = VideoConfig::new(EncoderType::H264Nvenc);
        preset.video.rate_control = Some(RateControlMode::Vbr);
        preset.video.preset = Some("p5".to_string());
        preset.video.bitrate_kbps = Some(5000);
        preset.video.max_bitrate_kbps = Some(3000);
        preset.video.buffer_size_kbits = Some(20000);

        let report = validate_preset(&preset);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.warnings().count(), 1);
        let maxrate_fix = report.fix(report.issues[0].fix_id.unwrap()).unwrap();
        assert_eq!(maxrate_fix.kind, FixKind::RaiseMaxrate { target_kbps: 5000 });

        fix_and_recheck(&mut preset, "validation.video.maxrateBelowBitrate");
        assert_eq!(preset.video.max_bitrate_kbps, Some(5000));
        // Buffer is still outside [5000, 15000].
        assert!(keys(&validate_preset(&preset)).contains(&"validation.video.bufsizeOutOfRange"));

        fix_and_recheck(&mut preset, "validation.video.bufsizeOutOfRange");
        assert_eq!(preset.video.buffer_size_kbits, Some(10000));
        assert!(validate_preset(&preset).issues.is_empty());
    }

    #[test]
    fn test_registry_rules() {
        let mut preset = base_preset();
        preset.video.rate_control = Some(RateControlMode::Cq);
        preset.video.quality_value = Some(80);
        preset.video.preset = Some("p7".to_string());
        let report = validate_preset(&preset);
        assert_eq!(
            keys(&report),
            vec![
                "validation.video.unsupportedRateControl",
                "validation.video.qualityOutOfRange",
                "validation.video.unknownPreset",
            ]
        );
        assert_eq!(report.issues[0].params["supported"], "crf, cbr, vbr");

        fix_and_recheck(&mut preset, "validation.video.unsupportedRateControl");
        assert_eq!(preset.video.rate_control, Some(RateControlMode::Crf));
        assert_eq!(preset.video.quality_value, Some(51));
        fix_and_recheck(&mut preset, "validation.video.unknownPreset");
        assert!(validate_preset(&preset).issues.is_empty());
    }

    #[test]
    fn test_unknown_encoder_is_a_warning() {
        let mut preset = base_preset();
        preset.video.encoder = EncoderType::from("libvpx-vp9".to_string());
        let report = validate_preset(&preset);
        assert_eq!(keys(&report), vec!["validation.video.unknownEncoder"]);
        assert!(!has_blocking_errors(&report));
        assert!(report.fixes.is_empty());
    }

    #[test]
    fn test_aac_fields_must_be_positive() {
        let mut preset = base_preset();
        preset.audio = AudioConfig::new(AudioCodecType::Aac);
        preset.audio.bitrate = Some(0);
        preset.audio.sample_rate_hz = Some(0);
        preset.audio.channels = Some(2);
        let report = validate_preset(&preset);
        assert_eq!(report.by_group[&IssueGroup::Audio].errors, 2);

        for fix in &report.fixes {
            apply_fix(&mut preset, &report, fix.id).unwrap();
        }
        assert!(validate_preset(&preset).issues.is_empty());
        assert_eq!(preset.audio.bitrate, None);
        assert_eq!(preset.audio.sample_rate_hz, None);
        assert_eq!(preset.audio.channels, Some(2));
    }

    #[test]
    fn test_complex_filter_warning_has_no_fix() {
        let mut preset = base_preset();
        preset.filters.filter_complex = Some("[0:v]split[a][b]".to_string());
        preset.filters.scale = Some("1280:-2".to_string());
        let report = validate_preset(&preset);
        assert_eq!(keys(&report), vec!["validation.filters.complexWithSimpleFilters"]);
        assert_eq!(report.issues[0].fix_id, None);
        assert_eq!(report.by_group[&IssueGroup::Filters].warnings, 1);
    }

    #[test]
    fn test_unknown_fix_id() {
        let mut preset = base_preset();
        let report = validate_preset(&preset);
        assert!(matches!(
            apply_fix(&mut preset, &report, 7),
            Err(PresetError::UnknownFix { id: 7 })
        ));
    }

    #[test]
    fn test_apply_all_fixes_converges() {
        let mut preset = base_preset();
        preset.video.rate_control = Some(RateControlMode::Vbr);
        preset.video.bitrate_kbps = Some(5000);
        preset.video.max_bitrate_kbps = Some(3000);
        preset.video.buffer_size_kbits = Some(20000);
        preset.input = Some(InputTimelineConfig {
            duration: Some("soon".to_string()),
            ..InputTimelineConfig::default()
        });
        assert!(apply_all_fixes(&mut preset) >= 3);
        assert!(validate_preset(&preset).fixes.is_empty());
    }
}
