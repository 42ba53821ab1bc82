//! Command-line front end: lexing, placeholder substitution and the option
//! allowlist

pub mod known_options;
pub mod lexer;
pub mod placeholders;

pub use known_options::{check_known_options, is_flag, strip_runtime_only};
pub use lexer::{join_tokens, lex, unquote};
pub use placeholders::{normalize_placeholders, NormalizedCommand};
