//! Allowlist of ffmpeg flags the structured importer understands

use crate::error::ImportError;

/// Known option with the number of value tokens it consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownOption {
    pub flag: &'static str,
    pub takes_value: bool,
}

const fn opt(flag: &'static str, takes_value: bool) -> KnownOption {
    KnownOption { flag, takes_value }
}

/// Flags that only steer the live process (progress channel, stdin, stats
/// cadence). They carry no preset information.
pub const RUNTIME_ONLY_OPTIONS: &[KnownOption] = &[
    opt("-progress", true),
    opt("-stats_period", true),
    opt("-nostdin", false),
    opt("-nostats", false),
];

/// Every flag one of the structured handlers consumes
pub const STRUCTURED_OPTIONS: &[KnownOption] = &[
    // global
    opt("-y", false),
    opt("-n", false),
    opt("-loglevel", true),
    opt("-hide_banner", false),
    opt("-report", false),
    // input / timeline
    opt("-i", true),
    opt("-ss", true),
    opt("-t", true),
    opt("-to", true),
    opt("-accurate_seek", false),
    opt("-stream_loop", true),
    opt("-itsoffset", true),
    opt("-hwaccel", true),
    opt("-hwaccel_device", true),
    opt("-hwaccel_output_format", true),
    // mapping
    opt("-map", true),
    opt("-map_metadata", true),
    opt("-map_chapters", true),
    opt("-metadata", true),
    opt("-disposition", true),
    // video
    opt("-c:v", true),
    opt("-crf", true),
    opt("-cq", true),
    opt("-global_quality", true),
    opt("-rc", true),
    opt("-qp", true),
    opt("-b:v", true),
    opt("-maxrate", true),
    opt("-bufsize", true),
    opt("-pass", true),
    opt("-passlogfile", true),
    opt("-preset", true),
    opt("-tune", true),
    opt("-profile:v", true),
    opt("-level", true),
    opt("-g", true),
    opt("-bf", true),
    opt("-pix_fmt", true),
    opt("-b_ref_mode", true),
    opt("-rc-lookahead", true),
    opt("-spatial-aq", true),
    opt("-temporal-aq", true),
    opt("-bsf", true),
    opt("-bsf:v", true),
    // audio
    opt("-c:a", true),
    opt("-b:a", true),
    opt("-ar", true),
    opt("-ac", true),
    opt("-channel_layout", true),
    // filters
    opt("-vf", true),
    opt("-af", true),
    opt("-filter_complex", true),
    opt("-sn", false),
    // output
    opt("-f", true),
    opt("-movflags", true),
];

/// Prefix of the stream-specifier form `-disposition:a:0`
pub const DISPOSITION_PREFIX: &str = "-disposition:";

/// True when a token is shaped like a flag. Negative numbers and durations
/// (`-1`, `-00:00:01`, `-.5`) are values, not flags.
pub fn is_flag(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some('-'), Some(c)) => !(c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

/// Look up a flag in the allowlist, including runtime-only flags
pub fn lookup(flag: &str) -> Option<KnownOption> {
    if flag.starts_with(DISPOSITION_PREFIX) && flag.len() > DISPOSITION_PREFIX.len() {
        return Some(opt("-disposition", true));
    }
    STRUCTURED_OPTIONS
        .iter()
        .chain(RUNTIME_ONLY_OPTIONS)
        .find(|o| o.flag == flag)
        .copied()
}

pub fn runtime_only(flag: &str) -> Option<KnownOption> {
    RUNTIME_ONLY_OPTIONS.iter().find(|o| o.flag == flag).copied()
}

pub fn is_runtime_only(flag: &str) -> bool {
    runtime_only(flag).is_some()
}

/// Reject the first flag-shaped token outside the allowlist
pub fn check_known_options<S: AsRef<str>>(args: &[S]) -> Result<(), ImportError> {
    for token in args.iter().map(AsRef::as_ref) {
        if is_flag(token) && lookup(token).is_none() {
            tracing::debug!(flag = token, "rejecting unsupported parameter");
            return Err(ImportError::UnsupportedParameter {
                flag: token.to_string(),
            });
        }
    }
    Ok(())
}

/// Remove runtime-only flags and their values from a token stream
pub fn strip_runtime_only(tokens: &[String]) -> Vec<String> {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut index = 0;
    while index < tokens.len() {
        match runtime_only(&tokens[index]) {
            Some(option) => {
                index += if option.takes_value { 2 } else { 1 };
            }
            None => {
                kept.push(tokens[index].clone());
                index += 1;
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_flag_exempts_negative_values() {
        assert!(is_flag("-map"));
        assert!(is_flag("-c:v"));
        assert!(!is_flag("-1"));
        assert!(!is_flag("-00:00:01"));
        assert!(!is_flag("-.5"));
        assert!(!is_flag("-"));
        assert!(!is_flag("out.mp4"));
    }

    #[test]
    fn test_lookup_disposition_with_specifier() {
        assert_eq!(lookup("-disposition:a:0").map(|o| o.takes_value), Some(true));
        assert!(lookup("-disposition:").is_none());
    }

    #[test]
    fn test_check_known_options() {
        let ok = ["-i", "INPUT", "-map_metadata", "-1", "-itsoffset", "-00:00:01", "OUTPUT"];
        assert!(check_known_options(&ok).is_ok());

        let bad = ["-i", "INPUT", "-x264-params", "keyint=60", "OUTPUT"];
        assert_eq!(
            check_known_options(&bad),
            Err(ImportError::UnsupportedParameter {
                flag: "-x264-params".to_string()
            })
        );
    }

    #[test]
    fn test_strip_runtime_only() {
        let tokens: Vec<String> = ["-progress", "pipe:2", "-nostdin", "-i", "INPUT", "OUTPUT", "-stats_period", "1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(strip_runtime_only(&tokens), vec!["-i", "INPUT", "OUTPUT"]);
    }
}
