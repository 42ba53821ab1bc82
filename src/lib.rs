//! ffpreset library
//!
//! Turns pasted ffmpeg command lines into structured presets that render back
//! to exactly the same command, and keeps those presets consistent while they
//! are edited.
//!
//! The pipeline is `command` (lexing, placeholders, option gate) ->
//! `parser` -> `render`, with `import` tying the stages together and checking
//! the round trip. `registry`, `normalize` and `validate` operate on presets
//! already in hand.

pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod import;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod render;
pub mod utils;
pub mod validate;

// Re-export commonly used types
pub use domain::model::{AudioCodecType, EncoderType, FFmpegPreset, RateControlMode, VideoConfig};
pub use error::{ImportError, PresetError, PresetResult};
pub use import::{analyze, build_custom_preset, CommandAnalysis, Eligibility};
pub use normalize::{normalize_preset, NormalizedPreset};
pub use render::{render_args, render_command};
pub use validate::{apply_all_fixes, apply_fix, validate_preset, ValidationReport};
