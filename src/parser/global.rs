//! Global flags: overwrite policy, log level, banner and report

use super::{invalid, Cursor, HandlerOutcome, HandlerResult, ParseState};
use crate::domain::model::OverwriteBehavior;

const LOG_LEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

pub(super) fn handle(state: &mut ParseState, cursor: &Cursor<'_>) -> HandlerResult {
    match cursor.token() {
        "-y" => {
            state.global.overwrite_behavior = Some(OverwriteBehavior::Overwrite);
            Ok(HandlerOutcome::Consumed(0))
        }
        "-n" => {
            state.global.overwrite_behavior = Some(OverwriteBehavior::NoOverwrite);
            Ok(HandlerOutcome::Consumed(0))
        }
        "-loglevel" => {
            let level = cursor.value()?;
            if !LOG_LEVELS.contains(&level) {
                return Err(invalid("-loglevel", level));
            }
            state.global.log_level = Some(level.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        "-hide_banner" => {
            state.global.hide_banner = Some(true);
            Ok(HandlerOutcome::Consumed(0))
        }
        "-report" => {
            state.global.enable_report = Some(true);
            Ok(HandlerOutcome::Consumed(0))
        }
        _ => Ok(HandlerOutcome::NotHandled),
    }
}
