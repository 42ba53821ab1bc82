//! Input and timeline flags: `-i`, seeking, duration, looping, offsets and
//! hardware decoding

use super::{invalid, Cursor, HandlerOutcome, HandlerResult, ParseState};
use crate::domain::model::{DurationMode, SeekMode, INPUT_PLACEHOLDER};
use crate::error::ImportError;
use crate::utils::time::{is_signed_time_expression, is_time_expression};

pub(super) fn handle(state: &mut ParseState, cursor: &Cursor<'_>) -> HandlerResult {
    let flag = cursor.token();
    match flag {
        "-i" => {
            let value = cursor.value()?;
            if value != INPUT_PLACEHOLDER {
                return Err(ImportError::InputNotPlaceholder {
                    value: value.to_string(),
                });
            }
            state.saw_input = true;
            state.before_input = false;
            Ok(HandlerOutcome::Consumed(1))
        }
        "-ss" => {
            let value = cursor.value()?;
            state.mark_once("-ss")?;
            if !is_time_expression(value) {
                return Err(invalid(flag, value));
            }
            state.input.seek_mode = Some(if state.before_input {
                SeekMode::Input
            } else {
                SeekMode::Output
            });
            state.input.seek_position = Some(value.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        "-t" | "-to" => {
            let value = cursor.value()?;
            state.mark_once("-t/-to")?;
            if !is_time_expression(value) {
                return Err(invalid(flag, value));
            }
            state.input.duration_mode = Some(if flag == "-t" {
                DurationMode::Duration
            } else {
                DurationMode::To
            });
            state.input.duration = Some(value.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        "-accurate_seek" => {
            state.require_before_input(flag)?;
            state.input.accurate_seek = Some(true);
            Ok(HandlerOutcome::Consumed(0))
        }
        "-stream_loop" => {
            let value = cursor.value()?;
            state.require_before_input(flag)?;
            let count: i64 = value.parse().map_err(|_| invalid(flag, value))?;
            if count < -1 {
                return Err(invalid(flag, value));
            }
            state.input.stream_loop = Some(count as f64);
            Ok(HandlerOutcome::Consumed(1))
        }
        "-itsoffset" => {
            let value = cursor.value()?;
            state.require_before_input(flag)?;
            if !is_signed_time_expression(value) {
                return Err(invalid(flag, value));
            }
            state.input.input_time_offset = Some(value.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        "-hwaccel" | "-hwaccel_device" | "-hwaccel_output_format" => {
            let value = cursor.value()?.to_string();
            state.require_before_input(flag)?;
            let slot = match flag {
                "-hwaccel" => &mut state.hardware.hwaccel,
                "-hwaccel_device" => &mut state.hardware.hwaccel_device,
                _ => &mut state.hardware.hwaccel_output_format,
            };
            *slot = Some(value);
            Ok(HandlerOutcome::Consumed(1))
        }
        _ => Ok(HandlerOutcome::NotHandled),
    }
}
