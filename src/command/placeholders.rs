//! Detection of the single input and output path and their replacement with
//! the `INPUT` / `OUTPUT` placeholders

use tracing::debug;

use crate::command::known_options::{is_flag, lookup, runtime_only};
use crate::command::lexer::requote;
use crate::domain::model::{INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER, PROGRAM_NAME};
use crate::error::ImportError;

/// Token stream with both placeholders substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCommand {
    /// Program name followed by the arguments
    pub tokens: Vec<String>,
    /// Arguments without the program name, ready to hand to a runner
    pub args: Vec<String>,
}

/// Substitute the placeholders into a lexed command.
///
/// A leading flag means the user pasted bare arguments; the canonical program
/// name is inserted in front. Input and output problems are both reported.
pub fn normalize_placeholders(mut tokens: Vec<String>) -> Result<NormalizedCommand, Vec<ImportError>> {
    if tokens.is_empty() {
        return Err(vec![ImportError::EmptyCommand]);
    }
    if is_flag(&tokens[0]) {
        tokens.insert(0, PROGRAM_NAME.to_string());
    }

    let mut reasons = Vec::new();

    let input_flags = tokens.iter().skip(1).filter(|t| t.as_str() == "-i").count();
    let input_values: Vec<usize> = (1..tokens.len())
        .filter(|&i| tokens[i] == "-i" && i + 1 < tokens.len())
        .map(|i| i + 1)
        .collect();

    let input_index = match (input_flags, input_values.as_slice()) {
        (1, [index]) => Some(*index),
        (0, _) | (1, _) => {
            reasons.push(ImportError::MissingInput);
            None
        }
        _ => {
            reasons.push(ImportError::MultipleInputs);
            None
        }
    };

    let output_candidate =
        last_real_index(&tokens).filter(|&i| is_output_candidate(&tokens, &input_values, i));
    let extra_positionals = (1..tokens.len())
        .filter(|&i| Some(i) != output_candidate)
        .filter(|&i| !input_values.contains(&i))
        .filter(|&i| is_bare_positional(&tokens, i))
        .count();

    let output_index = match (output_candidate, extra_positionals) {
        (Some(index), 0) => Some(index),
        (None, 0) => {
            reasons.push(ImportError::MissingOutput);
            None
        }
        (None, 1) => {
            reasons.push(ImportError::OutputNotLast);
            None
        }
        _ => {
            reasons.push(ImportError::MultipleOutputs);
            None
        }
    };

    match (input_index, output_index) {
        (Some(input), Some(output)) if reasons.is_empty() => {
            tokens[input] = requote(&tokens[input], INPUT_PLACEHOLDER);
            tokens[output] = requote(&tokens[output], OUTPUT_PLACEHOLDER);
            let args = tokens[1..].to_vec();
            Ok(NormalizedCommand { tokens, args })
        }
        _ => {
            debug!(?reasons, "placeholder normalization failed");
            Err(reasons)
        }
    }
}

/// The trailing token is the output unless it is a flag, the `-i` value or
/// the value of a known value-taking flag. Unknown flags never claim it.
fn is_output_candidate(tokens: &[String], input_values: &[usize], index: usize) -> bool {
    if is_flag(&tokens[index]) || input_values.contains(&index) {
        return false;
    }
    index == 1 || !matches!(lookup(&tokens[index - 1]), Some(option) if option.takes_value)
}

/// A non-flag token in the middle of the command that no flag consumes
fn is_bare_positional(tokens: &[String], index: usize) -> bool {
    if is_flag(&tokens[index]) {
        return false;
    }
    let previous = &tokens[index - 1];
    if index - 1 == 0 || !is_flag(previous) {
        return true;
    }
    // Unknown flags are assumed to take a value.
    matches!(lookup(previous), Some(option) if !option.takes_value)
}

/// Index of the last token that is not part of a runtime-only flag
fn last_real_index(tokens: &[String]) -> Option<usize> {
    let mut runtime = vec![false; tokens.len()];
    let mut index = 1;
    while index < tokens.len() {
        if let Some(option) = runtime_only(&tokens[index]) {
            runtime[index] = true;
            if option.takes_value && index + 1 < tokens.len() {
                runtime[index + 1] = true;
                index += 1;
            }
        }
        index += 1;
    }
    (1..tokens.len()).rev().find(|&i| !runtime[i])
}
