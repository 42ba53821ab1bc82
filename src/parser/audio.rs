//! Audio codec flags

use super::video::kbps;
use super::{invalid, Cursor, HandlerOutcome, HandlerResult, ParseState};
use crate::domain::model::AudioCodecType;
use crate::error::ImportError;

pub(super) fn handle(state: &mut ParseState, cursor: &Cursor<'_>) -> HandlerResult {
    let flag = cursor.token();
    match flag {
        "-c:a" => {
            let value = cursor.value()?;
            let codec = AudioCodecType::parse(value).ok_or_else(|| {
                ImportError::UnsupportedAudioCodec {
                    codec: value.to_string(),
                }
            })?;
            state.mark_once("-c:a")?;
            state.audio.codec = Some(codec);
        }
        "-b:a" => state.audio.bitrate = Some(kbps(flag, cursor.value()?)?),
        "-ar" | "-ac" => {
            let value = cursor.value()?;
            let number: u32 = value.parse().map_err(|_| invalid(flag, value))?;
            if flag == "-ar" {
                state.audio.sample_rate_hz = Some(number);
            } else {
                state.audio.channels = Some(number);
            }
        }
        "-channel_layout" => state.audio.channel_layout = Some(cursor.value()?.to_string()),
        _ => return Ok(HandlerOutcome::NotHandled),
    }
    Ok(HandlerOutcome::Consumed(1))
}
