//! Stream selection, metadata and dispositions

use super::{invalid, Cursor, HandlerOutcome, HandlerResult, ParseState};
use crate::command::known_options::DISPOSITION_PREFIX;

/// Input file index: `-1` disables copying, otherwise a non-negative index
fn file_index(flag: &str, value: &str) -> Result<i32, crate::error::ImportError> {
    match value.parse::<i32>() {
        Ok(index) if index >= -1 => Ok(index),
        _ => Err(invalid(flag, value)),
    }
}

pub(super) fn handle(state: &mut ParseState, cursor: &Cursor<'_>) -> HandlerResult {
    let flag = cursor.token();
    match flag {
        "-map" => {
            let value = cursor.value()?;
            state.mapping.maps.push(value.to_string());
            state.saw_map = true;
            Ok(HandlerOutcome::Consumed(1))
        }
        "-map_metadata" => {
            let index = file_index(flag, cursor.value()?)?;
            state.mapping.map_metadata_from_input_file_index = Some(index);
            Ok(HandlerOutcome::Consumed(1))
        }
        "-map_chapters" => {
            let index = file_index(flag, cursor.value()?)?;
            state.mapping.map_chapters_from_input_file_index = Some(index);
            Ok(HandlerOutcome::Consumed(1))
        }
        "-metadata" => {
            let value = cursor.value()?;
            state.mapping.metadata.push(value.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        "-disposition" => {
            let value = cursor.value()?;
            state.mapping.dispositions.push(value.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        _ => match flag.strip_prefix(DISPOSITION_PREFIX) {
            Some(spec) if !spec.is_empty() => {
                let value = cursor.value()?;
                state.mapping.dispositions.push(format!("{spec} {value}"));
                Ok(HandlerOutcome::Consumed(1))
            }
            _ => Ok(HandlerOutcome::NotHandled),
        },
    }
}
