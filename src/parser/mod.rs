//! Structured parser
//!
//! A single left-to-right scan over a placeholder-normalized token stream.
//! Every token is offered, in a fixed order, to seven domain handlers; the
//! first one that recognises it consumes it together with its value. A handler
//! error aborts the whole attempt: there is no partially structured preset.

mod audio;
mod filters;
mod global;
mod mapping;
mod output;
mod state;
mod timeline;
mod video;

use tracing::{debug, trace};

use crate::command::known_options::{check_known_options, is_flag, runtime_only, strip_runtime_only};
use crate::command::lexer::unquote;
use crate::domain::model::{FFmpegPreset, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
use crate::error::ImportError;

pub use state::{ParseState, PartialAudio, PartialVideo};

/// What a handler did with the token under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Offer the token to the next handler
    NotHandled,
    /// Token recognised; this many following tokens were consumed as well
    Consumed(usize),
}

pub type HandlerResult = Result<HandlerOutcome, ImportError>;

/// Domain handler signature
pub type Handler = fn(&mut ParseState, &Cursor<'_>) -> HandlerResult;

/// Handlers in dispatch order
pub const HANDLERS: [(&str, Handler); 7] = [
    ("global", global::handle),
    ("timeline", timeline::handle),
    ("mapping", mapping::handle),
    ("video", video::handle),
    ("audio", audio::handle),
    ("filters", filters::handle),
    ("output", output::handle),
];

/// Read-only view of the token under inspection
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    tokens: &'a [String],
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [String], index: usize) -> Self {
        Self { tokens, index }
    }

    /// Raw current token
    pub fn token(&self) -> &'a str {
        &self.tokens[self.index]
    }

    /// Current token without surrounding quotes
    pub fn unquoted(&self) -> &'a str {
        unquote(self.token())
    }

    /// Value token after the current flag, unquoted
    pub fn value(&self) -> Result<&'a str, ImportError> {
        self.tokens
            .get(self.index + 1)
            .map(|t| unquote(t))
            .ok_or_else(|| ImportError::MissingValue {
                flag: self.token().to_string(),
            })
    }

    /// True when nothing but runtime-only flags follow the current token
    pub fn only_runtime_after(&self) -> bool {
        strip_runtime_only(&self.tokens[self.index + 1..]).is_empty()
    }
}

/// Shorthand for an unparsable flag value
pub(crate) fn invalid(flag: &str, value: &str) -> ImportError {
    ImportError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}

/// Parse a normalized command (program name first) into a preset.
pub fn parse_structured(tokens: &[String]) -> Result<FFmpegPreset, Vec<ImportError>> {
    let args = tokens.get(1..).unwrap_or(&[]);
    check_known_options(args).map_err(|e| vec![e])?;

    let mut state = ParseState::new();
    let mut index = 0;

    'scan: while index < args.len() {
        let token = args[index].as_str();
        if let Some(option) = runtime_only(token) {
            trace!(token, "skipping runtime-only flag");
            index += if option.takes_value { 2 } else { 1 };
            continue;
        }

        let cursor = Cursor::new(args, index);
        for (name, handler) in HANDLERS.iter() {
            match handler(&mut state, &cursor) {
                Ok(HandlerOutcome::NotHandled) => {}
                Ok(HandlerOutcome::Consumed(extra)) => {
                    trace!(token, handler = name, extra, "token consumed");
                    index += 1 + extra;
                    continue 'scan;
                }
                Err(reason) => {
                    debug!(token, handler = name, %reason, "structured parse aborted");
                    return Err(vec![reason]);
                }
            }
        }

        let bare = unquote(token);
        if is_flag(token) {
            return Err(vec![ImportError::UnsupportedParameter {
                flag: token.to_string(),
            }]);
        }
        if bare != INPUT_PLACEHOLDER && bare != OUTPUT_PLACEHOLDER {
            return Err(vec![ImportError::UnrecognizedArgument {
                token: token.to_string(),
            }]);
        }
        index += 1;
    }

    state.finish()
}
