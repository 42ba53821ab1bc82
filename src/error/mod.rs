//! Error handling module for FFPreset

use thiserror::Error;

/// Reasons a command line could not be imported as a structured preset.
///
/// Every variant renders to the human readable sentence shown to the user
/// verbatim, so the wording is part of the contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Nothing to parse
    #[error("empty command")]
    EmptyCommand,

    /// No `-i` argument
    #[error("no -i input argument found")]
    MissingInput,

    /// More than one `-i` argument
    #[error("multiple -i inputs are not supported")]
    MultipleInputs,

    /// No trailing output path
    #[error("no output argument found")]
    MissingOutput,

    /// More than one bare positional argument
    #[error("multiple output arguments are not supported")]
    MultipleOutputs,

    /// The detected output is followed by other arguments
    #[error("output must be the last argument; multiple outputs are not supported")]
    OutputNotLast,

    /// Flag outside the known-option allowlist
    #[error("unsupported parameter: {flag}")]
    UnsupportedParameter { flag: String },

    /// Non-flag token no handler recognised
    #[error("unrecognized argument: {token}")]
    UnrecognizedArgument { token: String },

    /// Flag given as the last token without its value
    #[error("missing value for {flag}")]
    MissingValue { flag: String },

    /// Flag value that does not parse
    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },

    /// Flag that may only appear once
    #[error("{flag} may only be given once")]
    DuplicateOption { flag: String },

    /// Input-side flag used after `-i`
    #[error("{flag} is only supported before -i")]
    MustPrecedeInput { flag: String },

    /// `-i` followed by something other than the INPUT placeholder
    #[error("-i must be followed by the INPUT placeholder, got {value}")]
    InputNotPlaceholder { value: String },

    /// `-c:v` names an encoder outside the registry
    #[error("unknown video encoder: {encoder}")]
    UnknownEncoder { encoder: String },

    /// `-c:a` outside copy/aac
    #[error("unsupported audio codec: {codec}")]
    UnsupportedAudioCodec { codec: String },

    /// `-af` is never structured
    #[error("-af is not supported in structured presets; keep the command as a custom preset instead")]
    AudioFilterUnsupported,

    /// `-passlogfile` with a prefix other than the managed one
    #[error("custom -passlogfile prefixes are not supported: {value}")]
    CustomPasslogfile { value: String },

    /// Anything after the OUTPUT placeholder
    #[error("arguments after OUTPUT are not supported (multiple outputs unsupported)")]
    TrailingAfterOutput,

    /// `-i INPUT` never seen
    #[error("command has no -i INPUT argument")]
    InputNotSeen,

    /// No explicit `-map`
    #[error("command must select streams explicitly with -map")]
    MissingMap,

    /// No `-c:v`
    #[error("command must set a video encoder with -c:v")]
    MissingVideoEncoder,

    /// No `-c:a`
    #[error("command must set an audio codec with -c:a")]
    MissingAudioCodec,

    /// Required video field not derivable from the command
    #[error("command is missing the {field} required by encoder {encoder}")]
    MissingVideoField { field: String, encoder: String },

    /// Inferred rate-control mode the encoder cannot run
    #[error("rate control {mode} is not supported by encoder {encoder}")]
    UnsupportedRateControl { mode: String, encoder: String },

    /// Quality value outside the encoder's range
    #[error("quality {value} is outside {min}..={max} for encoder {encoder}")]
    QualityOutOfRange {
        value: i32,
        min: i32,
        max: i32,
        encoder: String,
    },

    /// Rendered canonical command differs from the input
    #[error("command does not exactly match the canonical form required to avoid silent field loss")]
    RoundTripMismatch,
}

/// Main error type for FFPreset operations outside the pure import pipeline
#[derive(Error, Debug)]
pub enum PresetError {
    /// Command cannot be kept even as a custom template
    #[error("Import failed: {}", .reasons.join("; "))]
    ImportFailed { reasons: Vec<String> },

    /// Fix id not offered by the validation report
    #[error("Unknown fix id: {id}")]
    UnknownFix { id: usize },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for FFPreset operations
pub type PresetResult<T> = std::result::Result<T, PresetError>;
