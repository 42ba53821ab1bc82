//! Filter graphs and subtitle handling

use super::{invalid, Cursor, HandlerOutcome, HandlerResult, ParseState};
use crate::domain::model::SubtitleStrategy;
use crate::error::ImportError;

/// Split a `-vf` chain into the structured slots; unknown segments are kept in
/// order as the residual chain
fn split_video_filters(state: &mut ParseState, chain: &str) -> Result<(), ImportError> {
    let mut residual = Vec::new();
    for segment in chain.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(args) = segment.strip_prefix("scale=") {
            state.filters.scale = Some(args.to_string());
        } else if let Some(args) = segment.strip_prefix("crop=") {
            state.filters.crop = Some(args.to_string());
        } else if let Some(args) = segment.strip_prefix("fps=") {
            let fps = args.parse().map_err(|_| invalid("-vf", segment))?;
            state.filters.fps = Some(fps);
        } else if segment.starts_with("subtitles=") {
            state.subtitles.strategy = Some(SubtitleStrategy::BurnIn);
            state.subtitles.burn_in_filter = Some(segment.to_string());
        } else {
            residual.push(segment);
        }
    }
    if !residual.is_empty() {
        state.filters.vf_chain = Some(residual.join(","));
    }
    Ok(())
}

pub(super) fn handle(state: &mut ParseState, cursor: &Cursor<'_>) -> HandlerResult {
    match cursor.token() {
        "-vf" => {
            let chain = cursor.value()?;
            state.mark_once("-vf")?;
            split_video_filters(state, chain)?;
            Ok(HandlerOutcome::Consumed(1))
        }
        "-af" => Err(ImportError::AudioFilterUnsupported),
        "-filter_complex" => {
            let graph = cursor.value()?;
            state.mark_once("-filter_complex")?;
            state.filters.filter_complex = Some(graph.to_string());
            Ok(HandlerOutcome::Consumed(1))
        }
        "-sn" => {
            state.subtitles.strategy = Some(SubtitleStrategy::Drop);
            Ok(HandlerOutcome::Consumed(0))
        }
        _ => Ok(HandlerOutcome::NotHandled),
    }
}
