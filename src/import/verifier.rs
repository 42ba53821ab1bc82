//! Round-trip check between an imported command and its rendered preset

use tracing::debug;

use crate::command::known_options::strip_runtime_only;
use crate::command::lexer::{lex, unquote};
use crate::domain::model::{FFmpegPreset, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER, PROGRAM_NAME};
use crate::error::ImportError;
use crate::render::render_command;

/// Comparable form of a token stream: canonical program name, one quote layer
/// removed, lowercase placeholders folded and no runtime-only flags
pub fn comparable_form(tokens: &[String]) -> String {
    let mut normalized: Vec<String> = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            if index == 0 {
                return PROGRAM_NAME.to_string();
            }
            let bare = unquote(token);
            match bare {
                "input" => INPUT_PLACEHOLDER.to_string(),
                "output" => OUTPUT_PLACEHOLDER.to_string(),
                _ => bare.to_string(),
            }
        })
        .collect();
    if !normalized.is_empty() {
        let args = strip_runtime_only(&normalized[1..]);
        normalized.truncate(1);
        normalized.extend(args);
    }
    normalized.join(" ")
}

/// Require the preset to render back to exactly the imported command
pub fn verify_round_trip(original: &[String], preset: &FFmpegPreset) -> Result<(), ImportError> {
    let expected = comparable_form(original);
    let rendered = comparable_form(&lex(&render_command(preset)));
    if expected == rendered {
        Ok(())
    } else {
        debug!(%expected, %rendered, "round trip mismatch");
        Err(ImportError::RoundTripMismatch)
    }
}
