//! Container flags and the OUTPUT placeholder

use super::{Cursor, HandlerOutcome, HandlerResult, ParseState};
use crate::domain::model::OUTPUT_PLACEHOLDER;
use crate::error::ImportError;

pub(super) fn handle(state: &mut ParseState, cursor: &Cursor<'_>) -> HandlerResult {
    match cursor.token() {
        "-f" => {
            state.container.format = Some(cursor.value()?.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        "-movflags" => {
            let flags = cursor.value()?;
            state.container.movflags.extend(
                flags
                    .split('+')
                    .filter(|f| !f.is_empty())
                    .map(str::to_string),
            );
            Ok(HandlerOutcome::Consumed(1))
        }
        _ if cursor.unquoted() == OUTPUT_PLACEHOLDER => {
            if !cursor.only_runtime_after() {
                return Err(ImportError::TrailingAfterOutput);
            }
            state.saw_output = true;
            Ok(HandlerOutcome::Consumed(0))
        }
        _ => Ok(HandlerOutcome::NotHandled),
    }
}
