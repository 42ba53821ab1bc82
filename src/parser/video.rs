//! Video encoder flags

use super::{invalid, Cursor, HandlerOutcome, HandlerResult, ParseState};
use crate::domain::model::{EncoderType, TWO_PASS_LOG_PREFIX};
use crate::error::ImportError;

/// Integer quality knob (`-crf`, `-cq`, `-qp`)
fn quality(flag: &str, value: &str) -> Result<i32, ImportError> {
    value.parse().map_err(|_| invalid(flag, value))
}

/// `5000k` or `5000`; always kbps
pub(super) fn kbps(flag: &str, value: &str) -> Result<i32, ImportError> {
    let digits = value.strip_suffix('k').unwrap_or(value);
    match digits.parse::<i32>() {
        Ok(rate) if rate > 0 => Ok(rate),
        _ => Err(invalid(flag, value)),
    }
}

fn count(flag: &str, value: &str) -> Result<u32, ImportError> {
    value.parse().map_err(|_| invalid(flag, value))
}

fn enabled(flag: &str, value: &str) -> Result<bool, ImportError> {
    match value {
        "1" => Ok(true),
        _ => Err(invalid(flag, value)),
    }
}

pub(super) fn handle(state: &mut ParseState, cursor: &Cursor<'_>) -> HandlerResult {
    let flag = cursor.token();
    let video = &mut state.video;
    match flag {
        "-c:v" => {
            let value = cursor.value()?;
            let encoder = EncoderType::parse(value).ok_or_else(|| ImportError::UnknownEncoder {
                encoder: value.to_string(),
            })?;
            state.mark_once("-c:v")?;
            state.video.encoder = Some(encoder);
        }
        "-crf" => video.crf = Some(quality(flag, cursor.value()?)?),
        "-cq" | "-global_quality" => video.cq = Some(quality(flag, cursor.value()?)?),
        "-qp" => video.qp = Some(quality(flag, cursor.value()?)?),
        "-rc" => {
            let value = cursor.value()?;
            if value != "constqp" {
                return Err(invalid(flag, value));
            }
            video.constqp = true;
        }
        "-b:v" => video.bitrate_kbps = Some(kbps(flag, cursor.value()?)?),
        "-maxrate" => video.max_bitrate_kbps = Some(kbps(flag, cursor.value()?)?),
        "-bufsize" => video.buffer_size_kbits = Some(kbps(flag, cursor.value()?)?),
        "-pass" => {
            let value = cursor.value()?;
            if value != "1" && value != "2" {
                return Err(invalid(flag, value));
            }
            // Both passes share one canonical two-pass preset.
            video.pass = Some(2);
        }
        "-passlogfile" => {
            let value = cursor.value()?;
            if value != TWO_PASS_LOG_PREFIX {
                return Err(ImportError::CustomPasslogfile {
                    value: value.to_string(),
                });
            }
        }
        "-preset" => video.preset = Some(cursor.value()?.to_string()),
        "-tune" => video.tune = Some(cursor.value()?.to_string()),
        "-profile:v" => video.profile = Some(cursor.value()?.to_string()),
        "-level" => video.level = Some(cursor.value()?.to_string()),
        "-pix_fmt" => video.pix_fmt = Some(cursor.value()?.to_string()),
        "-b_ref_mode" => video.b_ref_mode = Some(cursor.value()?.to_string()),
        "-g" => video.gop_size = Some(count(flag, cursor.value()?)?),
        "-bf" => video.bf = Some(count(flag, cursor.value()?)?),
        "-rc-lookahead" => video.rc_lookahead = Some(count(flag, cursor.value()?)?),
        "-spatial-aq" => video.spatial_aq = Some(enabled(flag, cursor.value()?)?),
        "-temporal-aq" => video.temporal_aq = Some(enabled(flag, cursor.value()?)?),
        "-bsf" | "-bsf:v" => {
            let value = cursor.value()?;
            state.hardware.bitstream_filters.push(value.to_string());
        }
        _ => return Ok(HandlerOutcome::NotHandled),
    }
    Ok(HandlerOutcome::Consumed(1))
}
